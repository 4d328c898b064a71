use std::borrow::Cow;
use std::fmt;

/// Key identifying a category of occurrence.
///
/// Either a textual name (`"user.created"`) or an integer tag (`911`).
/// Both forms can be built in `const` context, which is what
/// [`Event::NAME`] requires.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventName {
    /// A textual event name.
    Text(Cow<'static, str>),
    /// An integer (symbolic) event tag.
    Tag(i64),
}

impl EventName {
    /// Creates a textual name from a static string.
    #[must_use]
    pub const fn text(name: &'static str) -> Self {
        Self::Text(Cow::Borrowed(name))
    }

    /// Creates an integer tag.
    #[must_use]
    pub const fn tag(tag: i64) -> Self {
        Self::Tag(tag)
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(name) => f.write_str(name),
            Self::Tag(tag) => write!(f, "#{tag}"),
        }
    }
}

impl From<&'static str> for EventName {
    fn from(name: &'static str) -> Self {
        Self::text(name)
    }
}

impl From<String> for EventName {
    fn from(name: String) -> Self {
        Self::Text(Cow::Owned(name))
    }
}

impl From<Cow<'static, str>> for EventName {
    fn from(name: Cow<'static, str>) -> Self {
        Self::Text(name)
    }
}

impl From<i64> for EventName {
    fn from(tag: i64) -> Self {
        Self::Tag(tag)
    }
}

impl From<i32> for EventName {
    fn from(tag: i32) -> Self {
        Self::Tag(tag.into())
    }
}

impl From<u32> for EventName {
    fn from(tag: u32) -> Self {
        Self::Tag(tag.into())
    }
}

impl From<&Self> for EventName {
    fn from(name: &Self) -> Self {
        name.clone()
    }
}

/// Compile-time contract binding an event name to its payload type.
///
/// Implement it on a marker type per event; the typed emitter API then
/// rejects listeners and payloads of the wrong type at compile time.
///
/// # Example
/// ```rust
/// use herald_events::{Event, EventName};
///
/// struct Alarm;
///
/// impl Event for Alarm {
///     type Payload = (String, u32);
///     const NAME: EventName = EventName::tag(911);
/// }
///
/// assert_eq!(Alarm::NAME.to_string(), "#911");
/// ```
pub trait Event: 'static {
    /// Value delivered to every listener of this event.
    type Payload: ?Sized + 'static;

    /// Registry key of this event.
    const NAME: EventName;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_and_tag_are_distinct_keys() {
        assert_ne!(EventName::from("911"), EventName::from(911));
        assert_eq!(EventName::from("x"), EventName::from("x".to_owned()));
        assert_eq!(EventName::from(7_u32), EventName::tag(7));
    }

    #[test]
    fn display_marks_tags() {
        assert_eq!(EventName::text("helloworld").to_string(), "helloworld");
        assert_eq!(EventName::tag(-3).to_string(), "#-3");
    }
}
