#[path = "common/mod.rs"]
mod common;

use citypulse::{keyword_frequency, stopword_set, STOPWORDS};

#[test]
fn counts_tokens_longer_than_min_len_without_stopwords() {
    let stop = stopword_set(&["the", "in", "is"], std::iter::empty::<&str>());
    let texts = ["Traffic in Dhaka is bad", "Dhaka traffic again", "the metro helps"];
    let top = keyword_frequency(texts, &stop, 2, 10);
    assert_eq!(
        top,
        vec![
            ("traffic".to_string(), 2),
            ("dhaka".to_string(), 2),
            ("bad".to_string(), 1),
            ("again".to_string(), 1),
            ("metro".to_string(), 1),
            ("helps".to_string(), 1),
        ]
    );

    let top3 = keyword_frequency(texts, &stop, 2, 3);
    assert_eq!(top3.len(), 3);
    assert_eq!(top3[2].0, "bad");
}

#[test]
fn extra_stopwords_are_normalized() {
    let stop = stopword_set(STOPWORDS, [" Dhaka ", "TRAFFIC"]);
    assert!(stop.contains("dhaka"));
    assert!(stop.contains("traffic"));
    assert!(stop.contains("the"));

    let top = keyword_frequency(["Dhaka traffic, Dhaka metro"], &stop, 2, 5);
    assert_eq!(top, vec![("metro".to_string(), 1)]);
}

#[test]
fn digits_and_punctuation_split_tokens() {
    let stop = stopword_set(&[], std::iter::empty::<&str>());
    let top = keyword_frequency(["rent-free 2024 flats!!! flats?"], &stop, 2, 5);
    assert_eq!(top, vec![("flats".to_string(), 2), ("rent".to_string(), 1), ("free".to_string(), 1)]);
}
