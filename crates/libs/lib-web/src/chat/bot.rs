//! # Canned Chat Bot
//!
//! Picks the relay's automatic reply to a user message: the message is
//! classified with [`shared::classify`] and one of three fixed replies for that
//! category is chosen uniformly at random.

use rand::Rng;
use shared::{classify, Intent};

pub const GREETING_REPLIES: [&str; 3] = [
    "Hello! Welcome to SmartScale AI's live chat service. How can I assist you today?",
    "Hi there! I'm Sparky, the Smart AI assistant. How can I help with your AI needs?",
    "Greetings from SmartScale AI! I'm here to answer your questions and connect you with our team.",
];

pub const SERVICES_REPLIES: [&str; 3] = [
    "At SmartScale AI, we offer a range of services including AI Strategy & Consulting, Implementation & Integration, Business Process Automation, Predictive Analytics, and AI Training. Which area interests you most?",
    "Our services are designed to help businesses of all sizes leverage AI effectively. We can help with everything from strategy development to implementation and training. Would you like more details about a specific service?",
    "SmartScale AI specializes in making AI accessible and practical for small and mid-sized businesses. Our services include customized AI solutions, predictive analytics, and strategic consulting. Which aspect would you like to explore further?",
];

pub const PRICING_REPLIES: [&str; 3] = [
    "Our pricing is tailored to your specific needs and project scope. I'd be happy to connect you with our team who can provide a customized quote. Would you like someone to contact you?",
    "SmartScale AI offers flexible pricing models designed to fit businesses of various sizes. For accurate pricing information, our team would need to understand your specific requirements. Would you like to schedule a consultation?",
    "We believe in transparent and value-based pricing. While each project is unique, we work within your budget constraints to deliver maximum value. Can I connect you with our sales team for a personalized discussion?",
];

pub const CONTACT_REPLIES: [&str; 3] = [
    "You can reach our team at info@smartscaleai.ai or call us at (386)473-2002. Alternatively, I can take your information and have someone from our team contact you directly. Would that be helpful?",
    "The best way to get in touch is through our contact form on this website, or by emailing info@smartscaleai.ai. Would you like me to direct you to the contact section?",
    "Our team is available at (386)473-2002 or via email at info@smartscaleai.ai. You can also schedule a consultation directly through our website. How would you prefer to connect?",
];

pub const DEFAULT_REPLIES: [&str; 3] = [
    "That's an interesting question! SmartScale AI specializes in making artificial intelligence accessible and practical for businesses like yours. Would you like to know more about how we can help with your specific needs?",
    "Thanks for reaching out! Our team of AI experts would be happy to discuss this in more detail. Would you like me to arrange a consultation call with one of our specialists?",
    "Great question! At SmartScale AI, we focus on delivering tailored AI solutions that address your unique business challenges. Can you tell me more about what you're looking for so I can provide more specific information?",
];

/// Reply pool for an intent.
pub fn replies_for(intent: Intent) -> &'static [&'static str] {
    match intent {
        Intent::Greeting => &GREETING_REPLIES,
        Intent::Services => &SERVICES_REPLIES,
        Intent::Pricing => &PRICING_REPLIES,
        Intent::Contact => &CONTACT_REPLIES,
        Intent::Default => &DEFAULT_REPLIES,
    }
}

/// Pick a reply to `message`.
pub fn reply_to(message: &str) -> &'static str {
    let pool = replies_for(classify(message));
    pool[rand::rng().random_range(0..pool.len())]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_comes_from_matching_pool() {
        for _ in 0..20 {
            assert!(GREETING_REPLIES.contains(&reply_to("hello")));
            assert!(PRICING_REPLIES.contains(&reply_to("what does it cost")));
            assert!(DEFAULT_REPLIES.contains(&reply_to("tell me more")));
        }
    }

    #[test]
    fn test_every_intent_has_three_replies() {
        for intent in [
            Intent::Greeting,
            Intent::Services,
            Intent::Pricing,
            Intent::Contact,
            Intent::Default,
        ] {
            assert_eq!(replies_for(intent).len(), 3);
        }
    }
}
