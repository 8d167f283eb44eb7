//! Built-in lesson content.

use rust_decimal::Decimal;
use sokushuu_types::{Lesson, Question};

/// The "Crypto Basics" lesson played on the hero section card.
pub fn demo_lesson() -> Lesson {
    let questions = vec![
        question(
            1,
            "What is cryptocurrency?",
            &[
                "To enable anyone to transfer money globally",
                "It's just a coin",
                "It has no goal",
            ],
            0,
            "Cryptocurrencies, such as bitcoin, enable anyone to transfer money globally. Source: ethereum.org",
        ),
        question(
            2,
            "What is a blockchain?",
            &[
                "I don't know",
                "A distributed ledger technology",
                "A traditional database",
            ],
            1,
            "A blockchain is a distributed ledger technology that maintains a continuously growing list of records, called blocks, which are linked and secured using cryptography.",
        ),
        question(
            3,
            "What does 'decentralized' mean in cryptocurrency?",
            &[
                "Controlled by a single authority",
                "No central controlling authority",
                "Only available in certain countries",
            ],
            1,
            "Decentralized means there is no central controlling authority. Instead, the network is maintained by many participants around the world.",
        ),
    ];

    Lesson {
        id: String::from("crypto-basics-demo"),
        title: String::from("Crypto Basics"),
        description: String::from("Learn fundamental cryptocurrency concepts"),
        category: String::from("Fundamentals"),
        difficulty: String::from("Beginner"),
        estimated_time: String::from("2-3 min"),
        reward: Some(Decimal::new(50, 2)),
        total_questions: u32::try_from(questions.len()).unwrap_or(u32::MAX),
        thumbnail: String::from("\u{1f4b0}"),
        author: String::from("Sokushuu Team"),
        tags: vec![
            String::from("Crypto"),
            String::from("Basics"),
            String::from("Blockchain"),
        ],
        questions,
    }
}

fn question(
    id: u32,
    prompt: &str,
    options: &[&str],
    correct_answer: usize,
    explanation: &str,
) -> Question {
    Question {
        id,
        question: prompt.to_owned(),
        options: options.iter().map(|o| (*o).to_owned()).collect(),
        correct_answer,
        explanation: explanation.to_owned(),
    }
}
