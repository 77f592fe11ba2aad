//! Level-selection entries named `"Puzzle <number>"`.

/// Extracts the puzzle number from a menu entry name.
///
/// The number is the second whitespace-separated word; names without one, or
/// with something other than a non-negative integer there, select nothing.
pub(crate) fn puzzle_number(entry_name: &str) -> Option<usize> {
    entry_name.split_whitespace().nth(1)?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_the_second_word() {
        assert_eq!(puzzle_number("Puzzle 3"), Some(3));
        assert_eq!(puzzle_number("  Puzzle\t12 "), Some(12));
        assert_eq!(puzzle_number("Puzzle 2 extra"), Some(2));
    }

    #[test]
    fn unparseable_names_select_nothing() {
        for name in ["", "Puzzle", "Puzzle three", "Puzzle -1", "3"] {
            assert_eq!(puzzle_number(name), None, "{name:?}");
        }
    }
}
