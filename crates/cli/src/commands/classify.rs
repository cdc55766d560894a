//! `stylecast classify`: show keyword topic scores.

use stylecast_profile::classifier;

pub fn run(text: &str) {
    println!("Topic: {}", classifier::classify_label(text));
    for score in classifier::scores(text) {
        let marker = if score.score > 0 { "●" } else { "○" };
        println!("  {marker} {:<24} {}", score.topic, score.score);
    }
}
