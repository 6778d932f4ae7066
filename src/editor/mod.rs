//! Cell interaction state machine.
//!
//! Owns the selected cell, the editable cell and the edit draft:
//! - `Idle`: nothing selected
//! - `Selected`: one cell highlighted, not editable
//! - `Editing`: the selected cell is also the editable cell
//!
//! Every transition is total: events that make no sense in the current state
//! leave it untouched. Commit emits a [`CellChange`] only when the value differs
//! from what the cell held when editing started.

#[cfg(target_arch = "wasm32")]
pub(crate) mod input;

use log::{debug, warn};

use crate::types::{CellAddress, CellChange};

/// Coarse state of the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionMode {
    Idle,
    Selected,
    Editing,
}

/// Working value of the cell being edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    pub address: CellAddress,
    /// Cell text when editing started.
    pub original: String,
    pub draft: String,
}

/// Result of a commit request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    /// Value changed; the host must be notified.
    Changed(CellChange),
    /// Edit closed without a change.
    Unchanged,
    /// The address was not the editable cell; nothing happened.
    Ignored,
}

impl CommitOutcome {
    pub fn change(&self) -> Option<&CellChange> {
        match self {
            CommitOutcome::Changed(change) => Some(change),
            _ => None,
        }
    }
}

/// Selection and edit state of one table.
#[derive(Debug, Clone, Default)]
pub struct CellInteraction {
    selected: Option<CellAddress>,
    edit: Option<EditSession>,
    readonly: bool,
}

impl CellInteraction {
    pub fn new(readonly: bool) -> Self {
        Self {
            selected: None,
            edit: None,
            readonly,
        }
    }

    pub fn readonly(&self) -> bool {
        self.readonly
    }

    pub fn selected(&self) -> Option<&CellAddress> {
        self.selected.as_ref()
    }

    pub fn editable(&self) -> Option<&CellAddress> {
        self.edit.as_ref().map(|e| &e.address)
    }

    pub fn edit_session(&self) -> Option<&EditSession> {
        self.edit.as_ref()
    }

    pub fn mode(&self) -> InteractionMode {
        match (&self.selected, &self.edit) {
            (_, Some(_)) => InteractionMode::Editing,
            (Some(_), None) => InteractionMode::Selected,
            (None, None) => InteractionMode::Idle,
        }
    }

    pub fn is_editing(&self) -> bool {
        self.edit.is_some()
    }

    /// Cell the focus ring follows: the selected cell, else the editable one.
    pub fn active_cell(&self) -> Option<&CellAddress> {
        self.selected.as_ref().or_else(|| self.editable())
    }

    /// Single click: select `addr`, leaving edit mode.
    ///
    /// A pending edit on a different cell is committed first; clicking the cell
    /// being edited is a no-op.
    pub fn click(&mut self, addr: CellAddress, is_row_header: bool) -> CommitOutcome {
        if is_row_header {
            return CommitOutcome::Ignored;
        }
        let mut outcome = CommitOutcome::Ignored;
        if let Some(session) = &self.edit {
            if session.address == addr {
                return CommitOutcome::Ignored;
            }
            let (address, draft) = (session.address.clone(), session.draft.clone());
            outcome = self.commit(&address, &draft);
        }
        debug!("select {addr}");
        self.selected = Some(addr);
        self.edit = None;
        outcome
    }

    /// Double click: select `addr` and open it for editing with `current` as
    /// the starting text. Suppressed in read-only mode.
    pub fn double_click(&mut self, addr: CellAddress, is_row_header: bool, current: &str) {
        if self.readonly || is_row_header {
            return;
        }
        debug!("edit {addr}");
        self.selected = Some(addr.clone());
        self.edit = Some(EditSession {
            address: addr,
            original: current.to_string(),
            draft: current.to_string(),
        });
    }

    /// Open the selected cell for editing (Enter / F2).
    pub fn enter_edit(&mut self, current: &str) -> bool {
        if self.readonly || self.edit.is_some() {
            return false;
        }
        let Some(addr) = self.selected.clone() else {
            return false;
        };
        if addr.is_row_header() {
            return false;
        }
        debug!("edit {addr}");
        self.edit = Some(EditSession {
            address: addr,
            original: current.to_string(),
            draft: current.to_string(),
        });
        true
    }

    /// Replace the draft of the cell being edited.
    pub fn update_draft(&mut self, text: &str) {
        if let Some(session) = &mut self.edit {
            session.draft.clear();
            session.draft.push_str(text);
        }
    }

    /// Commit `value` for `addr`, which must be the editable cell.
    ///
    /// On success both the edit and the selection are cleared, whether or not
    /// the value changed.
    pub fn commit(&mut self, addr: &CellAddress, value: &str) -> CommitOutcome {
        let Some(session) = &self.edit else {
            warn!("commit for {addr} while no cell is editable");
            return CommitOutcome::Ignored;
        };
        if &session.address != addr {
            warn!("commit for {addr} but {} is editable", session.address);
            return CommitOutcome::Ignored;
        }
        let outcome = if session.original == value {
            CommitOutcome::Unchanged
        } else {
            CommitOutcome::Changed(CellChange {
                row_index: addr.row_index,
                column_id: addr.column_id.clone(),
                value: value.to_string(),
            })
        };
        debug!("commit {addr}: {outcome:?}");
        self.edit = None;
        self.selected = None;
        outcome
    }

    /// Commit the current draft of the editable cell.
    pub fn commit_draft(&mut self) -> CommitOutcome {
        let Some(session) = &self.edit else {
            return CommitOutcome::Ignored;
        };
        let (address, draft) = (session.address.clone(), session.draft.clone());
        self.commit(&address, &draft)
    }

    /// Abandon the edit, keeping the selection.
    pub fn cancel_edit(&mut self) -> bool {
        if self.edit.take().is_some() {
            debug!("cancel edit");
            return true;
        }
        false
    }

    /// Move the selection to `addr`, discarding any pending edit.
    pub fn select(&mut self, addr: CellAddress) {
        if self.edit.take().is_some() {
            debug!("discard edit on navigation");
        }
        self.selected = Some(addr);
    }

    /// Back to `Idle`.
    pub fn reset(&mut self) {
        self.selected = None;
        self.edit = None;
    }
}
