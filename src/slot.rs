use std::cell::RefCell;
use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

use crate::value::{ArgType, Conversion, Value};
use crate::{Error, ErrorKind};

/// Storage for a single declared argument.
///
/// The metadata is fixed at declaration time. The value and the parse
/// state live behind a [RefCell] since the slot is shared between the
/// [Registry][crate::Registry] and every [Arg] handle pointing at it.
pub struct Slot {
    long: Option<Box<str>>,
    short: Option<Box<str>>,
    help: Box<str>,
    required: bool,
    state: RefCell<State>,
}

struct State {
    value: Value,
    was_set: bool,
    error: Option<Box<str>>,
}

impl Slot {
    pub(crate) fn new(
        long: Option<Box<str>>,
        short: Option<Box<str>>,
        value: Value,
        help: Box<str>,
        required: bool,
    ) -> Self {
        Self {
            long,
            short,
            help,
            required,
            state: RefCell::new(State {
                value,
                was_set: false,
                error: None,
            }),
        }
    }

    /// The long name token, like `--count`.
    pub fn long(&self) -> Option<&str> {
        self.long.as_deref()
    }

    /// The short name token, like `-c`.
    pub fn short(&self) -> Option<&str> {
        self.short.as_deref()
    }

    /// Iterate over the name tokens bound to this slot, long name first.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.long().into_iter().chain(self.short())
    }

    /// Names joined as they appear in error reports, like `--count or -c`.
    pub(crate) fn label(&self) -> String {
        self.names().collect::<Vec<_>>().join(" or ")
    }

    /// The help text of the argument.
    pub fn help(&self) -> &str {
        &self.help
    }

    /// Test if the argument must be present on the command line.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Test if the value was set during the last parse.
    pub fn was_set(&self) -> bool {
        self.state.borrow().was_set
    }

    /// The error raised by the last failed conversion, if any.
    pub fn error(&self) -> Option<String> {
        self.state.borrow().error.as_deref().map(String::from)
    }

    /// Read the value as type `T`.
    ///
    /// Errors with [ErrorKind::TypeMismatch] if `T` is not the type the
    /// argument was declared with.
    pub fn value<T>(&self) -> Result<T, Error>
    where
        T: ArgType,
    {
        let state = self.state.borrow();

        match T::from_value(&state.value) {
            Some(value) => Ok(value.clone()),
            None => Err(Error::new(ErrorKind::TypeMismatch {
                expected: T::KIND,
                actual: state.value.kind(),
            })),
        }
    }

    /// Convert the token following a matched name into the value.
    ///
    /// The slot only counts as set when the conversion succeeds.
    pub fn convert(&self, raw: Option<&str>) -> Conversion {
        let mut state = self.state.borrow_mut();
        let conversion = state.value.convert(raw);

        match &conversion {
            Conversion::Failed(message) => {
                state.error = Some(message.clone());
            }
            _ => {
                state.was_set = true;
                state.error = None;
            }
        }

        conversion
    }

    /// Forget the outcome of a previous parse, keeping the value.
    pub(crate) fn reset(&self) {
        let mut state = self.state.borrow_mut();
        state.was_set = false;
        state.error = None;
    }

    fn with<T, R>(&self, f: impl FnOnce(&T) -> R) -> Result<R, Error>
    where
        T: ArgType,
    {
        let state = self.state.borrow();

        match T::from_value(&state.value) {
            Some(value) => Ok(f(value)),
            None => Err(Error::new(ErrorKind::TypeMismatch {
                expected: T::KIND,
                actual: state.value.kind(),
            })),
        }
    }

    fn set<T>(&self, value: T) -> Result<(), Error>
    where
        T: ArgType,
    {
        let mut state = self.state.borrow_mut();

        if state.value.kind() != T::KIND {
            return Err(Error::new(ErrorKind::TypeMismatch {
                expected: T::KIND,
                actual: state.value.kind(),
            }));
        }

        state.value = value.into_value();
        Ok(())
    }
}

impl fmt::Debug for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();

        f.debug_struct("Slot")
            .field("long", &self.long)
            .field("short", &self.short)
            .field("help", &self.help)
            .field("required", &self.required)
            .field("value", &state.value)
            .field("was_set", &state.was_set)
            .field("error", &state.error)
            .finish()
    }
}

/// A typed handle to the value of a declared argument.
///
/// Returned by [Registry::register][crate::Registry::register]. The handle
/// shares the slot with the registry, so values written by a parse are
/// visible through it and values written through it are seen by the
/// registry.
///
/// # Examples
///
/// ```rust
/// let mut registry = argslot::Registry::new();
/// let limit = registry.register::<u32>("limit", "l", 10, "The limit.", false)?;
///
/// assert_eq!(limit.get(), 10);
/// assert!(registry.parse(["-l", "20"]).is_success());
/// assert_eq!(limit.get(), 20);
///
/// limit.set(30);
/// assert_eq!(registry.value::<u32>("--limit")?, 30);
/// # Ok::<_, argslot::Error>(())
/// ```
pub struct Arg<T> {
    slot: Rc<Slot>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Arg<T>
where
    T: ArgType,
{
    pub(crate) fn new(slot: Rc<Slot>) -> Self {
        Self {
            slot,
            _marker: PhantomData,
        }
    }

    /// Get a copy of the current value.
    pub fn get(&self) -> T {
        match self.slot.value() {
            Ok(value) => value,
            Err(error) => panic!("{}", error),
        }
    }

    /// Access the current value by reference.
    ///
    /// The registry must not be parsing while the closure runs.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        match self.slot.with(f) {
            Ok(output) => output,
            Err(error) => panic!("{}", error),
        }
    }

    /// Overwrite the current value.
    pub fn set(&self, value: T) {
        if let Err(error) = self.slot.set(value) {
            panic!("{}", error);
        }
    }

    /// Test if the value was set during the last parse.
    pub fn was_set(&self) -> bool {
        self.slot.was_set()
    }

    /// The error raised when converting the value in the last parse.
    pub fn error(&self) -> Option<String> {
        self.slot.error()
    }

    /// Test if the argument must be present on the command line.
    pub fn is_required(&self) -> bool {
        self.slot.is_required()
    }

    /// The help text of the argument.
    pub fn help(&self) -> &str {
        self.slot.help()
    }

    /// Iterate over the name tokens of the argument, long name first.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.slot.names()
    }

    /// Access the slot backing this handle.
    pub fn slot(&self) -> &Slot {
        &self.slot
    }
}

impl<T> Clone for Arg<T> {
    fn clone(&self) -> Self {
        Self {
            slot: self.slot.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Arg<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.slot.fmt(f)
    }
}
