//! Keyword-bag multi-label topic classifier over a closed vocabulary.

use serde::{Deserialize, Serialize};

/// Ordered `(label, keywords)` table plus the label used when nothing matches.
/// Keywords are stored lowercase; matching is plain substring containment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TopicTable {
    topics: Vec<(String, Vec<String>)>,
    fallback: String,
}

pub const GENERAL: &str = "General";

impl Default for TopicTable {
    fn default() -> Self {
        Self::from_static(DEFAULT_TOPICS, GENERAL)
    }
}

impl TopicTable {
    pub fn new<I, L, K, S>(topics: I, fallback: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = (L, K)>,
        L: Into<String>,
        K: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let topics = topics
            .into_iter()
            .map(|(label, kws)| {
                let kws = kws
                    .into_iter()
                    .map(|k| k.as_ref().trim().to_lowercase())
                    .filter(|k| !k.is_empty())
                    .collect();
                (label.into(), kws)
            })
            .collect();
        Self { topics, fallback: fallback.into() }
    }

    fn from_static(table: &[(&str, &[&str])], fallback: &str) -> Self {
        Self::new(table.iter().map(|(l, k)| (*l, k.iter().copied())), fallback)
    }

    /// Twelve-category table tuned for country-wide (not city) discussions.
    pub fn general_interest() -> Self {
        Self::from_static(GENERAL_INTEREST_TOPICS, "General/Miscellaneous")
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.topics.iter().map(|(l, _)| l.as_str())
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    /// Every topic with at least one keyword contained in `text`, in table order;
    /// `[fallback]` when none match.
    pub fn categorize(&self, text: &str) -> Vec<String> {
        let lower = text.to_lowercase();
        let matched: Vec<String> = self
            .topics
            .iter()
            .filter(|(_, kws)| kws.iter().any(|k| lower.contains(k.as_str())))
            .map(|(l, _)| l.clone())
            .collect();
        if matched.is_empty() {
            vec![self.fallback.clone()]
        } else {
            matched
        }
    }
}

pub const DEFAULT_TOPICS: &[(&str, &[&str])] = &[
    ("Housing/Real Estate", &["apartment", "flat", "rent", "property", "home", "house", "building", "residing", "live", "neighborhood", "landlord", "tenant", "dhaka"]),
    ("Technology/Gadgets", &["phone", "laptop", "computer", "software", "app", "internet", "coding", "programming", "tech", "ai", "gaming", "device", "digital"]),
    ("Education/Career", &["university", "student", "school", "course", "job", "work", "career", "exam", "study", "college", "degree", "interview", "admission"]),
    ("Food/Dining", &["restaurant", "food", "eat", "cafe", "coffee", "meal", "dish", "cooking", "kitchen", "buffet", "delicious", "recipe"]),
    ("Health/Medical", &["doctor", "hospital", "health", "medical", "medicine", "disease", "treatment", "surgery", "mental", "therapy", "clinic", "illness"]),
    ("Shopping/Commerce", &["buy", "sell", "shop", "price", "market", "store", "product", "order", "delivery", "purchase", "discount", "ecommerce"]),
    ("Travel/Transportation", &["travel", "visit", "trip", "tour", "airport", "flight", "bus", "train", "tourist", "explore", "ride", "transportation"]),
    ("Relationships/Social", &["relationship", "marriage", "wife", "husband", "girlfriend", "boyfriend", "love", "couple", "wedding", "dating", "friend", "family"]),
    ("Sports/Recreation", &["football", "cricket", "sports", "match", "player", "team", "game", "league", "basketball", "exercise", "play", "win"]),
    ("Politics/Government", &["election", "government", "political", "minister", "politics", "parliament", "vote", "law", "police", "court", "bnp", "awami", "protest"]),
    ("Infrastructure/Urban", &["metro", "road", "traffic", "transport", "bridge", "construction", "development", "city", "urban", "public", "project", "congestion"]),
];

pub const GENERAL_INTEREST_TOPICS: &[(&str, &[&str])] = &[
    ("Food/Dining", &["food", "restaurant", "eat", "cafe", "breakfast", "lunch", "dinner", "soup", "biryani", "pizza", "burger", "tea"]),
    ("Healthcare/Medical", &["doctor", "hospital", "dermatologist", "surgery", "medicine", "health", "patient", "disease", "treatment", "psychiatrist", "dental", "baby"]),
    ("Housing/Real Estate", &["flat", "apartment", "rent", "house", "property", "building", "landlord", "tenant", "lease"]),
    ("Technology/Gadgets", &["phone", "laptop", "computer", "gadget", "software", "app", "tech", "keyboard", "repair", "gaming", "internet"]),
    ("Shopping/Commerce", &["buy", "shop", "sell", "store", "price", "cost", "product", "clothes", "shoes", "online", "market", "scam"]),
    ("Education/Career", &["job", "internship", "university", "college", "school", "exam", "study", "course", "learning", "work", "career", "abroad"]),
    ("Travel/Transportation", &["flight", "travel", "trip", "tour", "hotel", "transport", "road", "traffic", "taxi", "bus", "metro", "visa"]),
    ("Sports/Recreation", &["sports", "gym", "fitness", "football", "cricket", "badminton", "swimming", "climbing", "game", "exercise"]),
    ("Entertainment", &["movie", "concert", "music", "entertainment", "show", "event", "festival", "comedy", "film", "anime"]),
    ("Relationships/Social", &["relationship", "dating", "marriage", "wedding", "love", "couple", "friend", "family", "social"]),
    ("Politics/Government", &["politics", "government", "election", "minister", "parliament", "policy", "law", "party", "president", "police"]),
    ("Services/Professional", &["lawyer", "accountant", "tax", "legal", "repair", "service", "professional", "consultant"]),
];
