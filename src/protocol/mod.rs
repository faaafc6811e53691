//! Wire protocol for the enotify listener.
//!
//! One message per line: `|<length>|<payload>` where `<length>` is the
//! decimal character count of the payload. The listener reads the length,
//! then exactly that many characters; a trailing newline from the line write
//! is tolerated and never counted.

#[cfg(test)]
mod tests;

use crate::sexp::{Atom, Sexp, SexpMap};

/// Wrap an encoded payload in a length-prefixed frame.
///
/// The prefix counts characters, not bytes, to match the encoder's
/// text-oriented contract. `|` inside the payload is not escaped; the
/// receiver relies on the length alone. Both properties are fixed by the
/// listener's protocol and must not change.
pub fn frame(payload: &str) -> String {
    format!("|{}|{}", payload.chars().count(), payload)
}

/// Registration message announcing our slot and result handler:
/// `(:register <slot> :handler-fn <handler>)`.
pub fn registration(slot_id: &Atom, handler_fn: &Atom) -> Sexp {
    Sexp::Map(SexpMap::plist(vec![
        (Atom::new("register"), Sexp::Atom(slot_id.clone())),
        (Atom::new("handler_fn"), Sexp::Atom(handler_fn.clone())),
    ]))
}

/// What the listener shows for one test run: the modeline blurb plus the raw
/// suite output it switches to on click.
#[derive(Debug, Clone)]
pub struct Notification {
    pub slot_id: Atom,
    /// Short status glyph shown in the modeline ("S", "F", "P").
    pub text: String,
    /// Face atom selecting the glyph's color, keyword form.
    pub face: Atom,
    /// Tooltip shown on hover.
    pub help: String,
    /// Handler invoked on mouse-1.
    pub mouse_1: Atom,
    /// Raw suite output, displayed when the glyph is clicked.
    pub data: String,
}

impl Notification {
    /// Build the nested plist the listener expects:
    /// `(:id <slot> :notification (:text .. :face .. :help .. :mouse-1 ..) :data ..)`.
    pub fn to_sexp(&self) -> Sexp {
        let inner = SexpMap::plist(vec![
            (Atom::new("text"), Sexp::text(self.text.clone())),
            (Atom::new("face"), Sexp::Atom(self.face.clone())),
            (Atom::new("help"), Sexp::text(self.help.clone())),
            (Atom::new("mouse_1"), Sexp::Atom(self.mouse_1.clone())),
        ]);
        Sexp::Map(SexpMap::plist(vec![
            (Atom::new("id"), Sexp::Atom(self.slot_id.clone())),
            (Atom::new("notification"), Sexp::Map(inner)),
            (Atom::new("data"), Sexp::text(self.data.clone())),
        ]))
    }
}
