use std::collections::BTreeMap;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::help::Help;
use crate::slot::{Arg, Slot};
use crate::value::{ArgType, Conversion};
use crate::{Error, ErrorKind};

/// Default welcome line printed before the list of arguments.
const DEFAULT_WELCOME: &str = "This are the arguments available for this program:";

/// Default width which help texts are wrapped to.
const DEFAULT_WIDTH: usize = 80;

/// Settings which control how a [Registry] parses and formats help.
///
/// # Examples
///
/// ```rust
/// let settings = argslot::Settings::default()
///     .allow_unknown(true)
///     .welcome("Usage: tool [options]");
///
/// let mut registry = argslot::Registry::with_settings(settings);
/// let parsed = registry.parse(["--whatever"]);
///
/// assert!(parsed.is_success());
/// assert_eq!(parsed.unmatched(), ["--whatever"]);
/// ```
#[derive(Debug, Clone)]
pub struct Settings {
    help_enabled: bool,
    allow_unknown: bool,
    welcome: String,
    width: usize,
}

impl Settings {
    /// Intercept a lone `--help` or `-h` as a request for help (default:
    /// `true`).
    ///
    /// When disabled, `--help` and `-h` are ordinary name tokens.
    pub fn help_enabled(self, help_enabled: bool) -> Self {
        Self {
            help_enabled,
            ..self
        }
    }

    /// Accept unknown name tokens without reporting an error (default:
    /// `false`).
    ///
    /// Unknown tokens are collected as unmatched either way.
    pub fn allow_unknown(self, allow_unknown: bool) -> Self {
        Self {
            allow_unknown,
            ..self
        }
    }

    /// The line printed before the list of arguments in the help.
    pub fn welcome(self, welcome: impl Into<String>) -> Self {
        Self {
            welcome: welcome.into(),
            ..self
        }
    }

    /// The width help texts are wrapped to (default: 80).
    pub fn width(self, width: usize) -> Self {
        Self { width, ..self }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            help_enabled: true,
            allow_unknown: false,
            welcome: String::from(DEFAULT_WELCOME),
            width: DEFAULT_WIDTH,
        }
    }
}

/// The outcome of [Registry::parse].
#[derive(Debug)]
pub enum Parsed {
    /// Every argument was matched and converted and all required arguments
    /// are set.
    Matched {
        /// Tokens which didn't match any argument, in input order.
        unmatched: Vec<String>,
    },
    /// The input was a lone `--help` or `-h`.
    ///
    /// No other processing, including the check for required arguments,
    /// took place. It is up to the caller to print
    /// [help][Registry::help] and exit.
    Help,
    /// Parsing failed.
    Failed {
        /// Every error encountered, in the order they are reported.
        errors: Vec<Error>,
        /// Tokens which didn't match any argument, in input order.
        unmatched: Vec<String>,
    },
}

impl Parsed {
    /// Test if parsing succeeded without help being requested.
    pub fn is_success(&self) -> bool {
        matches!(self, Parsed::Matched { .. })
    }

    /// Test if help was requested.
    pub fn is_help(&self) -> bool {
        matches!(self, Parsed::Help)
    }

    /// Tokens which didn't match any argument.
    pub fn unmatched(&self) -> &[String] {
        match self {
            Parsed::Matched { unmatched } | Parsed::Failed { unmatched, .. } => unmatched,
            Parsed::Help => &[],
        }
    }

    /// The errors encountered while parsing.
    pub fn errors(&self) -> &[Error] {
        match self {
            Parsed::Failed { errors, .. } => errors,
            _ => &[],
        }
    }
}

/// A registry of typed arguments.
///
/// Arguments are declared with [Registry::register], which binds their
/// name tokens and hands back a typed [Arg] handle. [Registry::parse] then
/// walks the raw arguments, converts values into the matched slots and
/// reports every problem it finds in one go.
///
/// # Examples
///
/// ```rust
/// let mut registry = argslot::Registry::new();
/// let msg = registry.register::<String>("msg", "m", String::new(), "The message to print.", true)?;
/// let times = registry.register::<u32>("times", "t", 1, "The number of times to print.", false)?;
/// let num = registry.register::<bool>("num", "n", false, "Print line numbers.", false)?;
///
/// assert!(registry.parse(["-m", "hi", "-t", "3"]).is_success());
/// assert_eq!(msg.get(), "hi");
/// assert_eq!(times.get(), 3);
/// assert!(!num.get());
///
/// assert!(!registry.parse(["-t", "3"]).is_success());
/// assert_eq!(
///     registry.error_message(),
///     "The following required arguments was not set: --msg or -m"
/// );
/// # Ok::<_, argslot::Error>(())
/// ```
#[derive(Debug, Default)]
pub struct Registry {
    settings: Settings,
    slots: Vec<Rc<Slot>>,
    bindings: BTreeMap<Box<str>, Rc<Slot>>,
    error: String,
}

impl Registry {
    /// Construct an empty registry with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct an empty registry with the given settings.
    pub fn with_settings(settings: Settings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    /// Declare an argument of type `T`.
    ///
    /// The argument is bound to `--<long>` if `long` is non-empty and to
    /// `-<short>` if `short` is non-empty. It starts out with `default` as
    /// its value.
    ///
    /// # Errors
    ///
    /// Errors with [ErrorKind::UnnamedArgument] if both names are empty and
    /// with [ErrorKind::DuplicateName] if a name token is already bound or
    /// the long and short names form the same token, like `"x"` and `"-x"`.
    /// Nothing is registered on error.
    pub fn register<T>(
        &mut self,
        long: &str,
        short: &str,
        default: T,
        help: &str,
        required: bool,
    ) -> Result<Arg<T>, Error>
    where
        T: ArgType,
    {
        let long = prefixed("--", long);
        let short = prefixed("-", short);

        if long.is_none() && short.is_none() {
            return Err(Error::new(ErrorKind::UnnamedArgument));
        }

        if let (Some(long), Some(short)) = (&long, &short) {
            if long == short {
                return Err(Error::new(ErrorKind::DuplicateName { name: long.clone() }));
            }
        }

        for name in long.iter().chain(short.iter()) {
            if self.bindings.contains_key(name) {
                return Err(Error::new(ErrorKind::DuplicateName { name: name.clone() }));
            }
        }

        let slot = Rc::new(Slot::new(
            long,
            short,
            default.into_value(),
            help.into(),
            required,
        ));

        trace!("register: {:?}", slot);

        for name in slot.names() {
            self.bindings.insert(name.into(), slot.clone());
        }

        self.slots.push(slot.clone());
        Ok(Arg::new(slot))
    }

    /// Iterate over the declared arguments in declaration order.
    pub fn slots(&self) -> impl Iterator<Item = &Slot> {
        self.slots.iter().map(|slot| &**slot)
    }

    /// Look up the slot bound to the given name token, like `--count`.
    pub fn get(&self, name: &str) -> Option<&Slot> {
        self.bindings.get(name).map(|slot| &**slot)
    }

    /// Read the value bound to the given name token as type `T`.
    ///
    /// # Errors
    ///
    /// Errors with [ErrorKind::UnknownArgument] if the token isn't bound
    /// and with [ErrorKind::TypeMismatch] if the argument isn't of type
    /// `T`.
    pub fn value<T>(&self, name: &str) -> Result<T, Error>
    where
        T: ArgType,
    {
        match self.get(name) {
            Some(slot) => slot.value(),
            None => Err(Error::new(ErrorKind::UnknownArgument {
                argument: name.into(),
            })),
        }
    }

    /// Parse the arguments of the current process, as given by
    /// [std::env::args] without the program name.
    pub fn parse_env(&mut self) -> Parsed {
        let mut it = std::env::args();
        it.next();
        self.parse(it)
    }

    /// Parse the given arguments, not including the program name.
    ///
    /// Each token is looked up among the bound names. A matched argument
    /// converts the token after it, which is skipped unless the argument is
    /// a `bool` or `char`. Unknown tokens are collected as unmatched. All
    /// errors are collected before returning, and are also available
    /// through [Registry::error_message].
    pub fn parse<I>(&mut self, args: I) -> Parsed
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let args = args.into_iter().map(Into::into).collect::<Vec<String>>();
        self.error.clear();

        if self.settings.help_enabled && is_help_request(&args) {
            debug!("parse: help requested");
            return Parsed::Help;
        }

        for slot in &self.slots {
            slot.reset();
        }

        let mut errors = Vec::new();
        let mut unmatched = Vec::new();
        let mut i = 0;

        while let Some(arg) = args.get(i) {
            let slot = match self.bindings.get(arg.as_str()) {
                Some(slot) => slot,
                None => {
                    trace!("parse: unmatched `{}`", arg);

                    if !self.settings.allow_unknown {
                        errors.push(Error::new(ErrorKind::UnknownArgument {
                            argument: arg.as_str().into(),
                        }));
                    }

                    unmatched.push(arg.clone());
                    i += 1;
                    continue;
                }
            };

            let raw = args.get(i + 1).map(String::as_str);

            match slot.convert(raw) {
                Conversion::Unused => {
                    trace!("parse: `{}` set without a value", arg);
                    i += 1;
                }
                Conversion::Consumed => {
                    trace!("parse: `{}` set to {:?}", arg, raw);
                    i += 2;
                }
                Conversion::Failed(message) => {
                    trace!("parse: `{}` failed: {}", arg, message);

                    errors.push(Error::new(ErrorKind::Conversion {
                        name: arg.as_str().into(),
                        message,
                    }));

                    i += 2;
                }
            }
        }

        let labels = self
            .slots
            .iter()
            .filter(|slot| slot.is_required() && !slot.was_set())
            .map(|slot| slot.label().into_boxed_str())
            .collect::<Vec<_>>();

        if !labels.is_empty() {
            errors.push(Error::new(ErrorKind::MissingRequired { labels }));
        }

        debug!(
            "parse: {} arguments, {} unmatched, {} errors",
            args.len(),
            unmatched.len(),
            errors.len()
        );

        if errors.is_empty() {
            return Parsed::Matched { unmatched };
        }

        self.error = errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n");

        Parsed::Failed { errors, unmatched }
    }

    /// The aggregated error report of the last parse, one error per line.
    ///
    /// This is empty if the last parse succeeded.
    pub fn error_message(&self) -> &str {
        &self.error
    }

    /// Return a formatter for the help of this registry.
    ///
    /// # Examples
    ///
    /// ```rust
    /// let mut registry = argslot::Registry::new();
    /// registry.register::<bool>("verbose", "v", false, "Print more.", false)?;
    /// registry.register::<String>("", "o", String::new(), "Output file.", false)?;
    ///
    /// let expected = concat!(
    ///     "This are the arguments available for this program:\n",
    ///     "  --verbose  -v  Print more.\n",
    ///     "             -o  Output file.\n",
    /// );
    ///
    /// assert_eq!(registry.render_help(), expected);
    /// # Ok::<_, argslot::Error>(())
    /// ```
    pub fn help(&self) -> Help<'_> {
        Help::new(&self.settings.welcome, &self.slots, self.settings.width)
    }

    /// Render the help to a string.
    pub fn render_help(&self) -> String {
        self.help().to_string()
    }
}

fn prefixed(prefix: &str, name: &str) -> Option<Box<str>> {
    if name.is_empty() {
        return None;
    }

    Some(format!("{}{}", prefix, name).into())
}

fn is_help_request(args: &[String]) -> bool {
    matches!(args, [arg] if arg == "--help" || arg == "-h")
}

#[cfg(test)]
mod tests {
    use super::{is_help_request, prefixed, Registry, Settings};
    use crate::ErrorKind;

    #[test]
    fn help_request() {
        assert!(is_help_request(&[String::from("--help")]));
        assert!(is_help_request(&[String::from("-h")]));
        assert!(!is_help_request(&[String::from("-h"), String::from("x")]));
        assert!(!is_help_request(&[]));
    }

    #[test]
    fn names() {
        assert_eq!(prefixed("--", "count").as_deref(), Some("--count"));
        assert_eq!(prefixed("-", ""), None);
    }

    #[test]
    fn declaration_errors() {
        let mut registry = Registry::new();

        let error = registry
            .register::<bool>("", "", false, "", false)
            .unwrap_err();
        assert!(matches!(error.kind(), ErrorKind::UnnamedArgument));

        registry
            .register::<bool>("count", "c", false, "", false)
            .unwrap();

        let error = registry
            .register::<u32>("total", "c", 0, "", false)
            .unwrap_err();
        assert!(matches!(error.kind(), ErrorKind::DuplicateName { name } if &**name == "-c"));

        let error = registry
            .register::<bool>("x", "-x", false, "", true)
            .unwrap_err();
        assert!(matches!(error.kind(), ErrorKind::DuplicateName { name } if &**name == "--x"));

        // The failed declarations left nothing behind.
        assert!(registry.get("--total").is_none());
        assert!(registry.get("--x").is_none());
        assert_eq!(registry.slots().count(), 1);
    }

    #[test]
    fn settings() {
        let settings = Settings::default();
        assert!(settings.help_enabled);
        assert!(!settings.allow_unknown);
        assert_eq!(settings.width, 80);

        let settings = settings.help_enabled(false).width(40);
        assert!(!settings.help_enabled);
        assert_eq!(settings.width, 40);
    }
}
