use std::fmt;
use std::rc::Rc;

use crate::slot::Slot;

/// Formatter for the help of a [Registry][crate::Registry].
///
/// Prints the welcome line followed by one line per declared argument: its
/// long name, its short name and its help text. A missing name is left
/// blank. Help texts which don't fit in the configured width are wrapped
/// and indented to the help column.
#[derive(Clone, Copy)]
pub struct Help<'a> {
    welcome: &'a str,
    slots: &'a [Rc<Slot>],
    width: usize,
}

impl<'a> Help<'a> {
    pub(crate) fn new(welcome: &'a str, slots: &'a [Rc<Slot>], width: usize) -> Self {
        Self {
            welcome,
            slots,
            width,
        }
    }

    /// Format the help with the given width instead of the configured one.
    pub fn width(self, width: usize) -> Self {
        Self { width, ..self }
    }
}

impl fmt::Display for Help<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.welcome)?;

        let long_len = column_len(self.slots.iter().map(|s| s.long()));
        let short_len = column_len(self.slots.iter().map(|s| s.short()));

        for slot in self.slots {
            let mut init = String::new();

            for (name, len) in [(slot.long(), long_len), (slot.short(), short_len)] {
                if len > 0 {
                    init.push_str("  ");
                    init.push_str(name.unwrap_or_default());
                    init.extend(std::iter::repeat(' ').take(len - name.map_or(0, str::len)));
                }
            }

            init.push_str("  ");

            if slot.help().is_empty() {
                writeln!(f, "{}", init.trim_end())?;
            } else {
                let fill = init.len();
                textwrap(f, slot.help(), self.width, &init, fill)?;
            }
        }

        Ok(())
    }
}

impl fmt::Debug for Help<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Help")
            .field("welcome", &self.welcome)
            .field("width", &self.width)
            .finish()
    }
}

/// Join doc comment lines into a help text.
///
/// Consecutive lines are joined by a space, and an empty line starts a new
/// paragraph.
#[doc(hidden)]
pub fn join_docs(docs: &[&str]) -> String {
    let mut out = String::new();
    let mut paragraph = false;

    for line in docs.iter().map(|line| line.trim()) {
        if line.is_empty() {
            if !out.is_empty() {
                out.push('\n');
            }

            paragraph = false;
            continue;
        }

        if paragraph {
            out.push(' ');
        }

        out.push_str(line);
        paragraph = true;
    }

    out
}

fn column_len<'a, I>(names: I) -> usize
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    names
        .into_iter()
        .map(|name| name.map_or(0, str::len))
        .max()
        .unwrap_or_default()
}

/// Write `text` wrapped at `width`, prefixed by `init` and with every line
/// indented to `fill`.
fn textwrap(
    f: &mut fmt::Formatter<'_>,
    text: &str,
    width: usize,
    init: &str,
    fill: usize,
) -> fmt::Result {
    let available = width.saturating_sub(fill).max(1);
    let mut init = Some(init);

    for line in text.lines() {
        let mut line = line.trim_end();

        loop {
            let prefix = init.take().unwrap_or_default();

            if line.is_empty() {
                writeln!(f, "{}", prefix.trim_end())?;
                break;
            }

            f.write_str(prefix)?;
            fill_spaces(f, fill.saturating_sub(prefix.len()))?;

            match split_at_width(line, available) {
                Some((end, start)) => {
                    writeln!(f, "{}", &line[..end])?;
                    line = &line[start..];
                }
                None => {
                    writeln!(f, "{}", line)?;
                    break;
                }
            }
        }
    }

    return Ok(());

    fn fill_spaces(f: &mut fmt::Formatter<'_>, mut count: usize) -> fmt::Result {
        // Static buffer for quicker whitespace filling.
        static BUF: &str = "                                                                ";

        while count > 0 {
            f.write_str(&BUF[..usize::min(count, BUF.len())])?;
            count = count.saturating_sub(BUF.len());
        }

        Ok(())
    }
}

/// Find where to break `line` so that the head fits in `width` characters.
///
/// Returns the end of the head and the start of the tail, or `None` if the
/// line fits or has nowhere to break.
fn split_at_width(line: &str, width: usize) -> Option<(usize, usize)> {
    if line.chars().count() <= width {
        return None;
    }

    let mut space = None;

    for (n, (i, c)) in line.char_indices().enumerate() {
        if n > width {
            break;
        }

        if c == ' ' && i > 0 {
            space = Some(i);
        }
    }

    let space = space.or_else(|| line.find(' ').filter(|&i| i > 0))?;
    let end = line[..space].trim_end().len();
    let start = line[space..]
        .find(|c| c != ' ')
        .map_or(line.len(), |n| space + n);

    Some((end, start))
}

#[cfg(test)]
mod tests {
    use super::{join_docs, split_at_width};

    #[test]
    fn splits_at_last_fitting_space() {
        assert_eq!(split_at_width("short", 10), None);
        assert_eq!(split_at_width("hello big world", 10), Some((9, 10)));
        assert_eq!(split_at_width("hello  world", 6), Some((5, 7)));
        assert_eq!(split_at_width("overlong words", 3), Some((8, 9)));
        assert_eq!(split_at_width("unbreakable", 3), None);
    }

    #[test]
    fn joins_doc_lines() {
        assert_eq!(join_docs(&[]), "");
        assert_eq!(join_docs(&[" The message", " to print."]), "The message to print.");
        assert_eq!(join_docs(&[" First.", "", " Second."]), "First.\nSecond.");
    }
}
