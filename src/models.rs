use std::io::{self, Write};

pub const MODELS: [&str; 7] = [
    "gemma2-9b-it",
    "llama-3.3-70b-versatile",
    "llama-3.1-8b-instant",
    "llama-guard-3-8b",
    "llama3-70b-8192",
    "llama3-8b-8192",
    "mixtral-8x7b-32768",
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("'{0}' is not a number")]
    NotANumber(String),
    #[error("{choice} is not between 1 and {count}")]
    OutOfRange { choice: i64, count: usize },
}

/// Resolves a 1-based menu choice to its model identifier.
pub fn select_model(raw: &str) -> Result<&'static str, SelectionError> {
    let trimmed = raw.trim();
    let choice = trimmed
        .parse::<i64>()
        .map_err(|_| SelectionError::NotANumber(trimmed.to_string()))?;

    usize::try_from(choice)
        .ok()
        .and_then(|choice| choice.checked_sub(1))
        .and_then(|index| MODELS.get(index).copied())
        .ok_or(SelectionError::OutOfRange {
            choice,
            count: MODELS.len(),
        })
}

pub fn write_menu(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "Choose your AI model ")?;
    writeln!(out, "Select a number to proceed")?;
    for (idx, model) in MODELS.iter().enumerate() {
        writeln!(out, "{}. {}", idx + 1, model)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{MODELS, SelectionError, select_model, write_menu};

    #[test]
    fn every_menu_number_selects_the_matching_model() {
        for (idx, expected) in MODELS.iter().enumerate() {
            let input = (idx + 1).to_string();
            assert_eq!(select_model(&input), Ok(*expected));
        }
    }

    #[test]
    fn selection_tolerates_surrounding_whitespace() {
        assert_eq!(select_model(" 2\n"), Ok("llama-3.3-70b-versatile"));
    }

    #[test]
    fn non_numeric_selection_is_rejected() {
        assert_eq!(
            select_model("llama"),
            Err(SelectionError::NotANumber("llama".to_string()))
        );
        assert!(matches!(select_model(""), Err(SelectionError::NotANumber(_))));
    }

    #[test]
    fn out_of_range_selection_is_rejected() {
        for choice in [0, -1, 8, 1000] {
            assert_eq!(
                select_model(&choice.to_string()),
                Err(SelectionError::OutOfRange {
                    choice,
                    count: MODELS.len()
                })
            );
        }
    }

    #[test]
    fn menu_lists_models_one_based() {
        let mut out = Vec::new();
        write_menu(&mut out).expect("menu should render");
        let text = String::from_utf8(out).expect("menu should be utf-8");

        assert!(text.starts_with("Choose your AI model \nSelect a number to proceed\n"));
        assert!(text.contains("1. gemma2-9b-it\n"));
        assert!(text.contains("7. mixtral-8x7b-32768\n"));
    }
}
