//! People counting from image-description text.
//!
//! The image analyzer returns prose, not structured detections, so the count
//! is parsed out of the description: explicit numbers ("3 people", "five
//! individuals") first, then collective phrases ("a couple", "a crowd") with
//! fixed estimates.

use regex::Regex;
use std::sync::LazyLock;

/// Patterns whose first capture group names a count of people.
static COUNT_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"(?:group of|crowd of)?\s*(\w+)\s+(?:people|persons|individuals|men|women|adults|children)")
            .unwrap(),
        Regex::new(r"(?:shows|depicts|contains|has|features)\s+(\w+)\s+(?:people|persons)").unwrap(),
        Regex::new(r"(\w+)\s+(?:people|persons)\s+(?:sitting|standing|walking|gathered)").unwrap(),
    ]
});

/// Convert a spelled-out number (zero through twenty) to its value.
fn word_to_number(word: &str) -> Option<u32> {
    let n = match word {
        "zero" => 0,
        "one" => 1,
        "two" => 2,
        "three" => 3,
        "four" => 4,
        "five" => 5,
        "six" => 6,
        "seven" => 7,
        "eight" => 8,
        "nine" => 9,
        "ten" => 10,
        "eleven" => 11,
        "twelve" => 12,
        "thirteen" => 13,
        "fourteen" => 14,
        "fifteen" => 15,
        "sixteen" => 16,
        "seventeen" => 17,
        "eighteen" => 18,
        "nineteen" => 19,
        "twenty" => 20,
        _ => return None,
    };
    Some(n)
}

/// Count the people mentioned in a description.
///
/// Returns the first number (digit or word) qualifying a people noun, then
/// falls back to collective-phrase estimates, then 0.
pub fn count_in_text(text: &str) -> u32 {
    let lower = text.to_lowercase();

    for pattern in COUNT_PATTERNS.iter() {
        for caps in pattern.captures_iter(&lower) {
            let word = &caps[1];
            if let Ok(n) = word.parse::<u32>() {
                return n;
            }
            if let Some(n) = word_to_number(word) {
                return n;
            }
        }
    }

    // Collective phrases with fixed estimates
    if lower.contains("couple") {
        2
    } else if lower.contains("trio") || lower.contains("three people") {
        3
    } else if lower.contains("quartet") || lower.contains("four people") {
        4
    } else if lower.contains("crowd") || lower.contains("many people") {
        10
    } else if lower.contains("few people") {
        3
    } else if lower.contains("several people") {
        5
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digit_count() {
        assert_eq!(count_in_text("There are 3 people in the room."), 3);
        assert_eq!(count_in_text("12 people gathered outside."), 12);
    }

    #[test]
    fn test_word_count() {
        assert_eq!(count_in_text("five people standing near the entrance"), 5);
        assert_eq!(count_in_text("twenty children playing in a park"), 20);
        assert_eq!(count_in_text("The image shows two women talking."), 2);
    }

    #[test]
    fn test_group_prefix() {
        assert_eq!(count_in_text("A group of seven individuals at a table."), 7);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(count_in_text("Two People crossing the street"), 2);
    }

    #[test]
    fn test_phrase_couple() {
        assert_eq!(count_in_text("a couple walking on the beach"), 2);
    }

    #[test]
    fn test_phrase_crowd() {
        assert_eq!(count_in_text("a large crowd at the concert"), 10);
    }

    #[test]
    fn test_phrase_several() {
        assert_eq!(count_in_text("several people waiting in line"), 5);
    }

    #[test]
    fn test_phrase_few() {
        assert_eq!(count_in_text("a few people scattered around the plaza"), 3);
    }

    #[test]
    fn test_no_people() {
        assert_eq!(count_in_text("an empty street at dawn"), 0);
        assert_eq!(count_in_text(""), 0);
    }

    #[test]
    fn test_number_beats_phrase() {
        // An explicit count wins over the crowd estimate
        assert_eq!(count_in_text("a crowd of six people at the stage"), 6);
    }

    #[test]
    fn test_word_to_number_bounds() {
        assert_eq!(word_to_number("zero"), Some(0));
        assert_eq!(word_to_number("twenty"), Some(20));
        assert_eq!(word_to_number("thirty"), None);
        assert_eq!(word_to_number("people"), None);
    }
}
