//! # Keyword Intent Classifier
//!
//! Maps free text onto one of five reply categories by plain substring
//! containment. Both the server bot and the local chatbot use it; each keeps
//! its own pool of canned replies per category.
//!
//! Rules are tried in order and the first match wins:
//!
//! | Intent     | Keywords                    |
//! |------------|-----------------------------|
//! | Greeting   | `hello`, `hi`, `hey`        |
//! | Services   | `service`, `offer`, `provide` |
//! | Pricing    | `price`, `cost`, `much`     |
//! | Contact    | `contact`, `email`, `phone` |
//! | Default    | anything else               |
//!
//! Matching is deliberately naive: `"this"` contains `"hi"` and classifies as a greeting.

/// Reply category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    Greeting,
    Services,
    Pricing,
    Contact,
    Default,
}

const RULES: &[(Intent, &[&str])] = &[
    (Intent::Greeting, &["hello", "hi", "hey"]),
    (Intent::Services, &["service", "offer", "provide"]),
    (Intent::Pricing, &["price", "cost", "much"]),
    (Intent::Contact, &["contact", "email", "phone"]),
];

/// Classify a message by case-insensitive keyword containment.
pub fn classify(text: &str) -> Intent {
    let lower = text.to_lowercase();
    RULES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(intent, _)| *intent)
        .unwrap_or(Intent::Default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_each_category() {
        assert_eq!(classify("Hello there"), Intent::Greeting);
        assert_eq!(classify("What SERVICES do you have?"), Intent::Services);
        assert_eq!(classify("what does it cost"), Intent::Pricing);
        assert_eq!(classify("Can I get your phone number"), Intent::Contact);
        assert_eq!(classify("tell me about yourselves"), Intent::Default);
    }

    #[test]
    fn test_greeting_wins_over_later_rules() {
        // "hi" sits inside "this"; greeting is checked first.
        assert_eq!(classify("how much is this"), Intent::Greeting);
    }

    #[test]
    fn test_empty_text_is_default() {
        assert_eq!(classify(""), Intent::Default);
    }
}
