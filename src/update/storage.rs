//! Storage mutation handlers
//!
//! Applies host edits to the buffer and decides what to re-highlight.

use crate::commands::Cmd;
use crate::messages::StorageMsg;
use crate::model::{EditEvent, StorageModel};

use super::edit::{schedule_after_edit, schedule_full};

/// Handle storage mutation messages
pub fn update_storage(model: &mut StorageModel, msg: StorageMsg) -> Option<Cmd> {
    match msg {
        StorageMsg::ReplaceCharacters { range, text } => {
            let new_len = text.chars().count();
            if let Err(e) = model.buffer.replace(range.clone(), &text) {
                tracing::warn!("Rejected character edit: {}", e);
                return None;
            }
            model.revision = model.revision.wrapping_add(1);

            let event = EditEvent::characters(range, new_len);
            tracing::trace!(
                "Characters edited: {:?} (delta {}) rev {}",
                event.range,
                event.change_in_length,
                model.revision
            );

            let highlight = schedule_after_edit(model, event.range.clone());
            Cmd::join(Some(Cmd::Edited(event)), highlight)
        }

        StorageMsg::SetAttributes { range, attributes } => {
            if let Err(e) = model.buffer.set_attributes(range.clone(), attributes) {
                tracing::warn!("Rejected attribute edit: {}", e);
                return None;
            }
            Some(Cmd::Edited(EditEvent::attributes(range)))
        }

        StorageMsg::AddAttributes { range, attributes } => {
            if let Err(e) = model.buffer.add_attributes(range.clone(), &attributes) {
                tracing::warn!("Rejected attribute edit: {}", e);
                return None;
            }
            Some(Cmd::Edited(EditEvent::attributes(range)))
        }

        StorageMsg::SetLanguage(language) => {
            tracing::debug!("Language changed to {:?}", language);
            model.language = language;
            schedule_full(model)
        }
    }
}
