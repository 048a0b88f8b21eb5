//! # Sparky's Canned Replies
//!
//! The local bot's reply pools, one per [`Intent`], plus the fixed lines the
//! chat window shows for greetings, connection changes and training.
//! These are separate from the server bot's pools.

use super::training::TrainingBook;
use rand::Rng;
use shared::{classify, Intent};

pub const GREETING: &str = "Hi there! I'm Sparky, your friendly AI assistant. How can I help you learn about SmartScale AI solutions today?";

pub const LIVE_CONNECTED_NOTICE: &str = "Connected to live chat server. You can now chat with the AI team!";
pub const LIVE_DISCONNECTED_NOTICE: &str = "Disconnected from live chat server. Switched to local bot responses.";

/// Prepended to the local reply when a live message goes unanswered.
pub const NO_RESPONSE_PREFIX: &str = "I didn't get a response from the server. ";

pub const GREETING_REPLIES: [&str; 3] = [
    "Hello! How can I assist you with AI solutions today?",
    "Hi there! I'm Sparky, SmartScale's AI assistant. What can I help you with?",
    "Welcome to SmartScale AI! I'm here to answer your questions about our services.",
];

pub const SERVICES_REPLIES: [&str; 3] = [
    "SmartScale AI offers several services including AI Strategy & Consulting, AI Implementation, Process Automation, Predictive Analytics, and AI Training. Which one interests you most?",
    "Our most popular services include custom AI solution development, predictive analytics implementation, and AI strategy consulting. Would you like details about any of these?",
    "We specialize in making AI accessible to businesses of all sizes. Our services range from strategy development to full implementation and training. What specific service are you interested in?",
];

pub const PRICING_REPLIES: [&str; 3] = [
    "Our pricing is customized based on your specific needs and project scope. Would you like our team to contact you with a personalized quote?",
    "We offer flexible pricing options designed for businesses of all sizes. The best way to get accurate pricing is to schedule a free consultation with our team. Should I help you set that up?",
    "SmartScale AI provides tailored solutions with pricing that scales with your business. For detailed pricing information, our team would be happy to discuss your specific requirements.",
];

pub const CONTACT_REPLIES: [&str; 3] = [
    "You can reach our team at info@smartscaleai.ai or call us at (386)473-2002. Would you prefer I help you schedule a call instead?",
    "The best way to get in touch is through our contact form or by emailing info@smartscaleai.ai. Would you like me to direct you to our contact section?",
    "Our team is available at (386)473-2002 or via email at info@smartscaleai.ai. You can also fill out the contact form on this website. How would you prefer to connect?",
];

pub const DEFAULT_REPLIES: [&str; 3] = [
    "That's an interesting question! SmartScale AI specializes in making AI accessible for small and mid-sized businesses. Would you like to know more about a specific service?",
    "Thanks for reaching out! Our team would be happy to discuss this in more detail. Would you like me to arrange a consultation call?",
    "Great question! SmartScale AI offers custom AI solutions tailored to your business needs. Can you tell me more about what you're looking for?",
];

pub const TRAINING_REPLIES: [&str; 3] = [
    "I'm now in training mode! You can teach me by typing a question or keyword pattern, followed by the response you want me to give.",
    "Training mode activated! Please teach me what to say when users ask something.",
    "Ready to learn! Type in a question or phrase that a user might ask, and I'll remember it along with your response.",
];

pub fn replies_for(intent: Intent) -> &'static [&'static str] {
    match intent {
        Intent::Greeting => &GREETING_REPLIES,
        Intent::Services => &SERVICES_REPLIES,
        Intent::Pricing => &PRICING_REPLIES,
        Intent::Contact => &CONTACT_REPLIES,
        Intent::Default => &DEFAULT_REPLIES,
    }
}

pub fn pick(pool: &[&'static str]) -> &'static str {
    pool[rand::rng().random_range(0..pool.len())]
}

/// Sparky's local answer: a trained pattern if one matches, else a canned reply.
pub fn local_reply(text: &str, book: &TrainingBook) -> String {
    match book.find_match(text) {
        Some(entry) => entry.response.clone(),
        None => pick(replies_for(classify(text))).to_string(),
    }
}

pub fn training_prompt(pattern: &str) -> String {
    format!("Now, tell me how I should respond when someone asks about \"{pattern}\":")
}

pub fn training_confirmation(pattern: &str, response: &str) -> String {
    format!(
        "I've learned that when someone mentions \"{pattern}\", I should respond with \"{response}\". Is there anything else you'd like to teach me?"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chatbot::training::TrainingEntry;

    #[test]
    fn test_untrained_reply_comes_from_intent_pool() {
        let book = TrainingBook::in_memory();
        for _ in 0..10 {
            assert!(SERVICES_REPLIES.contains(&local_reply("what do you offer", &book).as_str()));
            assert!(DEFAULT_REPLIES.contains(&local_reply("tell me more", &book).as_str()));
        }
    }

    #[test]
    fn test_trained_pattern_wins_over_classifier() {
        let mut book = TrainingBook::in_memory();
        book.push(TrainingEntry::custom("Hello", "Howdy partner"));

        assert_eq!(local_reply("well HELLO there", &book), "Howdy partner");
    }

    #[test]
    fn test_training_lines() {
        assert_eq!(
            training_prompt("refunds"),
            "Now, tell me how I should respond when someone asks about \"refunds\":"
        );
        assert!(training_confirmation("refunds", "Within 30 days")
            .starts_with("I've learned that when someone mentions \"refunds\", I should respond with \"Within 30 days\"."));
    }
}
