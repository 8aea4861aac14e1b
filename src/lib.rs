//! A typed command-line argument registry.
//!
//! Arguments are declared by name, type, default value and help text. Each
//! declaration hands back a typed [Arg] handle through which the value is
//! read after parsing. Parsing reports *every* problem with the command line
//! in one go rather than stopping at the first one.
//!
//! We provide:
//! * Arguments of type [String], the fixed width integers, [f32], [f64],
//!   [bool] and [char].
//! * Long (`--count`) and short (`-c`) names for each argument.
//! * Required arguments.
//! * An aggregated error report covering unknown arguments, values which
//!   could not be converted and missing required arguments.
//! * Formatting of help messages.
//!
//! We *do not* provide:
//! * Subcommands, positional arguments or arguments which can be repeated.
//! * The `--name=value` form. A value is always the token following the
//!   name.
//! * Falling back to environment variables.
//!
//! # Parsing rules
//!
//! Each token is looked up among the declared names. If it matches, the
//! token after it is converted into the argument's value and skipped.
//! Booleans are the exception: they are toggled by the name alone. A `char`
//! argument takes the first character of the following token *without*
//! skipping it.
//!
//! Tokens which don't match any name are collected as unmatched, and are
//! reported as errors unless [Settings::allow_unknown] is set. A lone
//! `--help` or `-h` is reported as [Parsed::Help] unless
//! [Settings::help_enabled] is turned off.
//!
//! # Examples
//!
//! > This is available as a runnable example:
//! > ```sh
//! > cargo run --example simple
//! > ```
//!
//! ```rust
//! argslot::define! {
//!     /// This program will print a message a number of times.
//!     struct Args {
//!         /// The message to print.
//!         msg: String = ("msg", "m", required = true),
//!         /// The number of times the message is printed.
//!         times: u32 = ("times", "t", default = 1),
//!         /// Print line numbers for the message.
//!         num: bool = ("num", "n"),
//!     }
//! }
//!
//! # fn main() -> Result<(), argslot::Error> {
//! let mut args = Args::new()?;
//!
//! match args.parse(["-m", "hi", "-t", "3"]) {
//!     argslot::Parsed::Matched { .. } => {}
//!     argslot::Parsed::Help => println!("{}", args.help()),
//!     argslot::Parsed::Failed { .. } => {
//!         println!("{}\n\n{}", args.error_message(), args.help());
//!     }
//! }
//!
//! assert_eq!(args.msg.get(), "hi");
//! assert_eq!(args.times.get(), 3);
//! assert!(!args.num.get());
//! # Ok(()) }
//! ```

#![deny(missing_docs)]

use std::error;
use std::fmt;

mod help;
mod registry;
mod slot;
mod value;

#[doc(hidden)]
/// Macro helpers. Not intended for public use!
pub mod helpers {
    pub use crate::help::join_docs;
}

pub use self::help::Help;
pub use self::registry::{Parsed, Registry, Settings};
pub use self::slot::{Arg, Slot};
pub use self::value::{ArgType, Conversion, Kind, Value};

/// An error raised by argslot.
#[derive(Debug)]
pub struct Error {
    kind: Box<ErrorKind>,
}

impl Error {
    /// Construct a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind: Box::new(kind),
        }
    }

    /// Access the underlying error kind.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind.as_ref() {
            ErrorKind::UnknownArgument { argument } => {
                write!(f, "Unknown argument: {}", argument)
            }
            ErrorKind::Conversion { name, message } => {
                write!(f, "Error in argument: {}, {}", name, message)
            }
            ErrorKind::MissingRequired { labels } => {
                write!(
                    f,
                    "The following required arguments was not set: {}",
                    labels.join(", ")
                )
            }
            ErrorKind::TypeMismatch { expected, actual } => {
                write!(
                    f,
                    "type mismatch: expected `{}` but the argument is `{}`",
                    expected, actual
                )
            }
            ErrorKind::UnnamedArgument => {
                write!(f, "argument declared without a long or a short name")
            }
            ErrorKind::DuplicateName { name } => {
                write!(f, "argument name `{}` is already bound", name)
            }
        }
    }
}

impl error::Error for Error {}

/// The kind of an error.
#[derive(Debug)]
pub enum ErrorKind {
    /// Encountered a token which isn't bound to any argument.
    ///
    /// Only reported by a parse if unknown arguments are not allowed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// let mut registry = argslot::Registry::new();
    /// registry.register::<bool>("verbose", "v", false, "", false)?;
    ///
    /// let parsed = registry.parse(["-x"]);
    ///
    /// assert!(matches!(parsed.errors()[0].kind(), argslot::ErrorKind::UnknownArgument { .. }));
    /// assert_eq!(registry.error_message(), "Unknown argument: -x");
    /// # Ok::<_, argslot::Error>(())
    /// ```
    UnknownArgument {
        /// The token which wasn't recognized.
        argument: Box<str>,
    },
    /// The value following an argument couldn't be converted to the type of
    /// the argument, or there was no value at all.
    ///
    /// # Examples
    ///
    /// ```rust
    /// let mut registry = argslot::Registry::new();
    /// registry.register::<u32>("times", "t", 1, "", false)?;
    ///
    /// let parsed = registry.parse(["--times", "3x"]);
    ///
    /// assert!(matches!(parsed.errors()[0].kind(), argslot::ErrorKind::Conversion { .. }));
    /// assert_eq!(
    ///     registry.error_message(),
    ///     "Error in argument: --times, \"3x\" is not a positive integer."
    /// );
    /// # Ok::<_, argslot::Error>(())
    /// ```
    Conversion {
        /// The name token of the argument, like `--times`.
        name: Box<str>,
        /// What went wrong.
        message: Box<str>,
    },
    /// Required arguments were not set.
    ///
    /// All missing arguments are reported through a single error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// let mut registry = argslot::Registry::new();
    /// registry.register::<u32>("count", "c", 0, "", true)?;
    /// registry.register::<String>("name", "", String::new(), "", true)?;
    ///
    /// let parsed = registry.parse(Vec::<String>::new());
    ///
    /// assert!(matches!(parsed.errors()[0].kind(), argslot::ErrorKind::MissingRequired { .. }));
    /// assert_eq!(
    ///     registry.error_message(),
    ///     "The following required arguments was not set: --count or -c, --name"
    /// );
    /// # Ok::<_, argslot::Error>(())
    /// ```
    MissingRequired {
        /// The names of each missing argument, like `--count or -c`.
        labels: Vec<Box<str>>,
    },
    /// A value was requested as a different type than the argument was
    /// declared with.
    ///
    /// This is a programming error, and never part of a parse report.
    TypeMismatch {
        /// The type the value was requested as.
        expected: Kind,
        /// The type of the argument.
        actual: Kind,
    },
    /// An argument was declared without a long or a short name.
    UnnamedArgument,
    /// An argument was declared with a name already in use.
    DuplicateName {
        /// The name token already in use, like `--count`.
        name: Box<str>,
    },
}

/// Declare a structure holding a [Registry] and a typed [Arg] handle for
/// each argument.
///
/// Each field is declared as `name: Type = ("long", "short", ...)` where an
/// empty name means the argument has no name of that form. The optional
/// `default = <expr>` sets the initial value (otherwise [Default::default])
/// and `required = <expr>` marks the argument as required. Doc comments on
/// fields become their help texts, and doc comments on the structure become
/// the welcome line of the help.
///
/// The generated structure provides `new`, `with_settings`, `parse`, `args`,
/// `help`, `error_message` and `registry`.
///
/// # Examples
///
/// ```rust
/// argslot::define! {
///     /// Tool which does things.
///     struct Args {
///         /// The input to read.
///         pub input: String = ("input", "i", required = true),
///         /// Limit the number of things (default: 10).
///         pub limit: usize = ("limit", "", default = 10),
///         /// Separator to use.
///         pub sep: char = ("", "s", default = ','),
///     }
/// }
///
/// # fn main() -> Result<(), argslot::Error> {
/// let mut args = Args::new()?;
///
/// assert!(args.parse(["-i", "in.txt", "--limit", "5"]).is_success());
/// assert_eq!(args.input.get(), "in.txt");
/// assert_eq!(args.limit.get(), 5);
/// assert_eq!(args.sep.get(), ',');
///
/// assert!(args.parse(["--help"]).is_help());
/// assert!(args.help().to_string().starts_with("Tool which does things.\n"));
/// # Ok(()) }
/// ```
///
/// Settings can be passed explicitly:
///
/// ```rust
/// argslot::define! {
///     struct Args {
///         verbose: bool = ("verbose", "v"),
///     }
/// }
///
/// # fn main() -> Result<(), argslot::Error> {
/// let settings = argslot::Settings::default().allow_unknown(true);
/// let mut args = Args::with_settings(settings)?;
///
/// let parsed = args.parse(["-v", "file.txt"]);
/// assert!(parsed.is_success());
/// assert_eq!(parsed.unmatched(), ["file.txt"]);
/// assert!(args.verbose.get());
/// # Ok(()) }
/// ```
#[macro_export]
macro_rules! define {
    (
        $(#[doc = $doc:literal])*
        $vis:vis struct $name:ident {
            $(
                $(#[doc = $field_doc:literal])*
                $field_vis:vis $field:ident: $ty:ty = (
                    $long:literal, $short:literal
                    $(, default = $default:expr)?
                    $(, required = $required:expr)?
                    $(,)?
                )
            ),* $(,)?
        }
    ) => {
        $(#[doc = $doc])*
        $vis struct $name {
            __argslot_registry: $crate::Registry,
            $($(#[doc = $field_doc])* $field_vis $field: $crate::Arg<$ty>,)*
        }

        impl $name {
            /// Construct the arguments with the default settings.
            #[allow(dead_code)]
            $vis fn new() -> ::core::result::Result<Self, $crate::Error> {
                Self::with_settings($crate::__impl!(@settings $($doc)*))
            }

            /// Construct the arguments with the given settings.
            #[allow(dead_code)]
            $vis fn with_settings(
                settings: $crate::Settings,
            ) -> ::core::result::Result<Self, $crate::Error> {
                let mut __argslot_registry = $crate::Registry::with_settings(settings);

                $(
                    let $field = __argslot_registry.register::<$ty>(
                        $long,
                        $short,
                        $crate::__impl!(@default $($default)?),
                        &$crate::helpers::join_docs(&[$($field_doc),*]),
                        $crate::__impl!(@required $($required)?),
                    )?;
                )*

                ::core::result::Result::Ok(Self { __argslot_registry, $($field,)* })
            }

            /// Parse the given arguments, not including the program name.
            #[allow(dead_code)]
            $vis fn parse<I>(&mut self, args: I) -> $crate::Parsed
            where
                I: ::core::iter::IntoIterator,
                I::Item: ::core::convert::Into<::std::string::String>,
            {
                self.__argslot_registry.parse(args)
            }

            /// Parse [std::env::args].
            #[allow(dead_code)]
            $vis fn args(&mut self) -> $crate::Parsed {
                self.__argslot_registry.parse_env()
            }

            /// Return a formatter for the help of these arguments.
            #[allow(dead_code)]
            $vis fn help(&self) -> $crate::Help<'_> {
                self.__argslot_registry.help()
            }

            /// The aggregated error report of the last parse.
            #[allow(dead_code)]
            $vis fn error_message(&self) -> &str {
                self.__argslot_registry.error_message()
            }

            /// Access the underlying registry.
            #[allow(dead_code)]
            $vis fn registry(&self) -> &$crate::Registry {
                &self.__argslot_registry
            }
        }
    };
}

/// Internal implementation details of the [define] macro.
#[doc(hidden)]
#[macro_export]
macro_rules! __impl {
    (@settings) => {
        $crate::Settings::default()
    };

    (@settings $($doc:literal)+) => {
        $crate::Settings::default().welcome($crate::helpers::join_docs(&[$($doc),+]))
    };

    (@default) => {
        ::core::default::Default::default()
    };

    (@default $default:expr) => {
        $default
    };

    (@required) => {
        false
    };

    (@required $required:expr) => {
        $required
    };
}
