#![forbid(unsafe_code)]

//! Change notifications for a single spin field.
//!
//! Every value change made through user-facing operations
//! ([`SpinEdit::raise`], [`SpinEdit::lower`], [`SpinEdit::edit`]) follows a
//! two-phase protocol:
//!
//! 1. **Propose**: [`on_changing`](ValueChangeListener::on_changing) sees
//!    the candidate value and may veto it by returning `false`.
//! 2. **Commit or revert**: an approved candidate becomes the field's value
//!    and [`on_changed`](ValueChangeListener::on_changed) fires; a vetoed one
//!    leaves the committed value and display untouched.
//!
//! Programmatic setters (`set_value`, `set_min`, `set_max`) never notify.
//!
//! Listeners are shared as `Rc<dyn ValueChangeListener>` and take `&self`;
//! implementors that record state use `Cell`/`RefCell`.

use crate::spin_edit::SpinEdit;

/// Observer and gatekeeper for one [`SpinEdit`].
///
/// All methods have permissive defaults, so implementors override only what
/// they need.
pub trait ValueChangeListener {
    /// A change to `candidate` is about to be committed. Return `false` to
    /// veto it.
    fn on_changing(&self, _source: &SpinEdit, _candidate: i32) -> bool {
        true
    }

    /// A change was committed. `source.value()` is the new value.
    fn on_changed(&self, _source: &SpinEdit) {}

    /// The raise button was activated, before the change is proposed.
    fn on_raising(&self, _source: &SpinEdit) {}

    /// The lower button was activated, before the change is proposed.
    fn on_lowering(&self, _source: &SpinEdit) {}
}
