//! Campos observables de los modelos del wizard.
//!
//! Un `Field<T>` es un handle compartido (`Rc`) sobre un valor y una lista de
//! callbacks. Clonar el handle no clona el valor: todos los clones ven y
//! modifican el mismo campo. Las notificaciones son síncronas y ocurren en la
//! misma pila de llamadas que la mutación.
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

type Observer<T> = Box<dyn Fn(&T)>;

struct FieldInner<T> {
  value: RefCell<T>,
  observers: RefCell<Vec<Observer<T>>>,
}

pub struct Field<T> {
  inner: Rc<FieldInner<T>>,
}

impl<T: Clone + PartialEq + 'static> Field<T> {
  pub fn new(value: T) -> Self {
    Self { inner: Rc::new(FieldInner { value: RefCell::new(value), observers: RefCell::new(Vec::new()) }) }
  }

  /// Copia del valor actual.
  pub fn get(&self) -> T {
    self.inner.value.borrow().clone()
  }

  /// Acceso de sólo lectura sin clonar.
  pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
    f(&self.inner.value.borrow())
  }

  /// Asigna `value` y notifica a los observadores si cambió. Devuelve
  /// `true` cuando hubo cambio.
  ///
  /// Los observadores reciben una copia del nuevo valor, así que pueden leer
  /// o volver a asignar este mismo campo; no pueden registrar observadores
  /// nuevos sobre él durante la notificación.
  pub fn set(&self, value: T) -> bool {
    {
      let mut current = self.inner.value.borrow_mut();
      if *current == value {
        return false;
      }
      *current = value.clone();
    }
    for observer in self.inner.observers.borrow().iter() {
      observer(&value);
    }
    true
  }

  /// Registra un callback que se invoca tras cada cambio de valor.
  pub fn observe(&self, observer: impl Fn(&T) + 'static) {
    self.inner.observers.borrow_mut().push(Box::new(observer));
  }

  pub fn observer_count(&self) -> usize {
    self.inner.observers.borrow().len()
  }
}

impl<T> Clone for Field<T> {
  fn clone(&self) -> Self {
    Self { inner: Rc::clone(&self.inner) }
  }
}

impl<T: Default + Clone + PartialEq + 'static> Default for Field<T> {
  fn default() -> Self {
    Self::new(T::default())
  }
}

impl<T: fmt::Debug> fmt::Debug for Field<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_tuple("Field").field(&*self.inner.value.borrow()).finish()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::cell::Cell;

  #[test]
  fn notifies_only_on_change() {
    let field = Field::new(1);
    let hits = Rc::new(Cell::new(0));
    let h = hits.clone();
    field.observe(move |_| h.set(h.get() + 1));

    assert!(field.set(2));
    assert!(!field.set(2));
    assert_eq!(hits.get(), 1);
    assert_eq!(field.get(), 2);
  }

  #[test]
  fn clones_share_the_value() {
    let a = Field::new(String::from("x"));
    let b = a.clone();
    b.set("y".into());
    assert_eq!(a.get(), "y");
  }

  #[test]
  fn observer_may_reset_the_same_field() {
    let field = Field::new(false);
    let handle = field.clone();
    field.observe(move |v| {
      if *v {
        handle.set(false);
      }
    });
    field.set(true);
    assert!(!field.get());
  }
}
