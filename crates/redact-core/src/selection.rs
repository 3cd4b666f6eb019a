//! Selection policy
//!
//! Every detected occurrence starts out selected. Leaving something
//! unredacted always takes an explicit operator action.
//!
//! Membership is tracked per occurrence (type, position), so two identical
//! values of the same type can be selected independently. `toggle_value`
//! keeps the by-value behaviour for callers that only know the value.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{DetectedData, SensitiveType, ValidationError};

type Result<T> = std::result::Result<T, ValidationError>;

/// How much of the detected data is currently selected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coverage {
    /// Every detected occurrence will be redacted
    Full,
    /// Some sensitive data may remain visible
    Partial,
    /// Nothing selected; redaction is blocked
    Empty,
}

/// Which occurrences of the detected data are chosen for redaction
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    flags: IndexMap<SensitiveType, Vec<bool>>,
}

impl SelectionState {
    /// Safety-first default: all occurrences of all types selected
    pub fn seeded(detected: &DetectedData) -> Self {
        let flags = detected
            .iter()
            .map(|(ty, values)| (ty.clone(), vec![true; values.len()]))
            .collect();
        Self { flags }
    }

    pub fn is_selected(&self, ty: &SensitiveType, index: usize) -> bool {
        self.flags
            .get(ty)
            .and_then(|flags| flags.get(index))
            .copied()
            .unwrap_or(false)
    }

    /// Flip one occurrence. Returns the new membership.
    pub fn toggle(&mut self, ty: &SensitiveType, index: usize) -> Result<bool> {
        let flags = self.flags_mut(ty)?;
        let flag = flags
            .get_mut(index)
            .ok_or_else(|| ValidationError::IndexOutOfRange {
                ty: ty.to_string(),
                index,
            })?;
        *flag = !*flag;
        Ok(*flag)
    }

    /// Flip every occurrence equal to `value` together.
    ///
    /// If any of them is selected they all become deselected, otherwise they
    /// all become selected. Returns the new membership.
    pub fn toggle_value(
        &mut self,
        detected: &DetectedData,
        ty: &SensitiveType,
        value: &str,
    ) -> Result<bool> {
        let positions: Vec<usize> = detected
            .values(ty)
            .iter()
            .enumerate()
            .filter(|(_, v)| v.as_str() == value)
            .map(|(i, _)| i)
            .collect();

        if positions.is_empty() {
            return Err(ValidationError::ValueNotDetected(ty.to_string()));
        }

        let flags = self.flags_mut(ty)?;
        let currently_selected = positions
            .iter()
            .any(|&i| flags.get(i).copied().unwrap_or(false));
        for i in positions {
            if let Some(flag) = flags.get_mut(i) {
                *flag = !currently_selected;
            }
        }
        Ok(!currently_selected)
    }

    pub fn select_all(&mut self, ty: &SensitiveType) -> Result<()> {
        self.flags_mut(ty)?.iter_mut().for_each(|f| *f = true);
        Ok(())
    }

    pub fn deselect_all(&mut self, ty: &SensitiveType) -> Result<()> {
        self.flags_mut(ty)?.iter_mut().for_each(|f| *f = false);
        Ok(())
    }

    pub fn selected_count(&self) -> usize {
        self.flags.values().flatten().filter(|f| **f).count()
    }

    pub fn selected_in(&self, ty: &SensitiveType) -> usize {
        self.flags
            .get(ty)
            .map(|flags| flags.iter().filter(|f| **f).count())
            .unwrap_or(0)
    }

    pub fn total_count(&self) -> usize {
        self.flags.values().map(Vec::len).sum()
    }

    pub fn coverage(&self) -> Coverage {
        match self.selected_count() {
            0 => Coverage::Empty,
            n if n == self.total_count() => Coverage::Full,
            _ => Coverage::Partial,
        }
    }

    /// Freeze the selection into the payload sent to the backend.
    ///
    /// Selected occurrences keep detection order. Types with nothing selected
    /// are left out.
    pub fn build_request(&self, detected: &DetectedData) -> Result<RedactionRequest> {
        let mut items_to_redact = IndexMap::new();

        for (ty, flags) in &self.flags {
            let values = detected.values(ty);
            if values.len() != flags.len() {
                return Err(ValidationError::StaleSelection(ty.to_string()));
            }

            let selected: Vec<String> = values
                .iter()
                .zip(flags)
                .filter(|(_, selected)| **selected)
                .map(|(value, _)| value.clone())
                .collect();

            if !selected.is_empty() {
                items_to_redact.insert(ty.clone(), selected);
            }
        }

        if items_to_redact.is_empty() {
            return Err(ValidationError::EmptySelection);
        }

        Ok(RedactionRequest { items_to_redact })
    }

    fn flags_mut(&mut self, ty: &SensitiveType) -> Result<&mut Vec<bool>> {
        self.flags
            .get_mut(ty)
            .ok_or_else(|| ValidationError::UnknownType(ty.to_string()))
    }
}

/// Body of the redact call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedactionRequest {
    pub items_to_redact: IndexMap<SensitiveType, Vec<String>>,
}

impl RedactionRequest {
    pub fn item_count(&self) -> usize {
        self.items_to_redact.values().map(Vec::len).sum()
    }
}
