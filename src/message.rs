use crate::core::task::Priority;

/// Everything the UI can ask the application to do.
///
/// `Prompt*` and `ConfirmDelete` only ask the UI to collect input; the
/// answer comes back as the matching data-carrying variant.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    ShowHelp,
    ShowDetail,
    Refresh,
    Quit,

    PromptQuickAdd,
    PromptFilter,
    PromptContent,
    PromptDue,
    PromptProject,
    ConfirmDelete,

    QuickAdd(String),
    SetFilter(String),
    EditContent(String),
    EditDue(String),
    MoveProject(String),
    SetPriority(Priority),
    Complete,
    Delete,
    ReopenLast,
}

impl Message {
    /// Key binding of the task table.
    pub fn from_key(key: char) -> Option<Self> {
        let message = match key {
            '?' => Self::ShowHelp,
            'v' | '\n' => Self::ShowDetail,
            'a' => Self::PromptQuickAdd,
            'f' => Self::PromptFilter,
            'e' => Self::PromptContent,
            'd' => Self::PromptDue,
            'p' => Self::PromptProject,
            'r' => Self::Refresh,
            'C' => Self::Complete,
            'D' => Self::ConfirmDelete,
            'u' => Self::ReopenLast,
            '1'..='4' => {
                let level = key.to_digit(10)? as u8;
                Self::SetPriority(Priority::from_displayed(level)?)
            }
            'q' => Self::Quit,
            _ => return None,
        };
        Some(message)
    }

    /// Whether the message acts on the selected row.
    pub fn needs_selection(&self) -> bool {
        matches!(
            self,
            Self::ShowDetail
                | Self::PromptContent
                | Self::PromptDue
                | Self::PromptProject
                | Self::ConfirmDelete
                | Self::EditContent(_)
                | Self::EditDue(_)
                | Self::MoveProject(_)
                | Self::SetPriority(_)
                | Self::Complete
                | Self::Delete
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digit_keys_map_to_displayed_priority() {
        assert_eq!(Message::from_key('1'), Some(Message::SetPriority(Priority::Urgent)));
        assert_eq!(Message::from_key('4'), Some(Message::SetPriority(Priority::Normal)));
        assert_eq!(Message::from_key('5'), None);
    }

    #[test]
    fn case_matters_for_destructive_keys() {
        assert_eq!(Message::from_key('C'), Some(Message::Complete));
        assert_eq!(Message::from_key('c'), None);
        assert_eq!(Message::from_key('D'), Some(Message::ConfirmDelete));
        assert_eq!(Message::from_key('d'), Some(Message::PromptDue));
    }

    #[test]
    fn selection_requirements() {
        assert!(Message::Complete.needs_selection());
        assert!(!Message::PromptQuickAdd.needs_selection());
        assert!(!Message::ReopenLast.needs_selection());
    }
}
