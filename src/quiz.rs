// =============================================================================
// Quiz Bank — fixed question sets per learning level
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::types::LearningMode;

/// One multiple-choice question. `correct` indexes into `options`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    pub options: [String; 4],
    pub correct: usize,
    pub explanation: String,
}

impl QuizQuestion {
    fn new(question: &str, options: [&str; 4], correct: usize, explanation: &str) -> Self {
        Self {
            question: question.to_string(),
            options: options.map(str::to_string),
            correct,
            explanation: explanation.to_string(),
        }
    }

    pub fn is_correct(&self, answer: usize) -> bool {
        answer == self.correct
    }
}

/// Question set for a level name. Unknown levels get an empty set.
pub fn questions_for_level(level: &str) -> Vec<QuizQuestion> {
    level
        .parse::<LearningMode>()
        .map(questions_for)
        .unwrap_or_default()
}

pub fn questions_for(mode: LearningMode) -> Vec<QuizQuestion> {
    match mode {
        LearningMode::Beginner => vec![
            QuizQuestion::new(
                "What is a stock?",
                ["Loan to company", "Ownership in a company", "Company profit", "Bank deposit"],
                1,
                "A stock represents ownership in a company.",
            ),
            QuizQuestion::new(
                "What does NSE stand for?",
                ["National Stock Exchange", "New Stock Enterprise", "National Share Entity", "None"],
                0,
                "NSE is India's main stock exchange.",
            ),
            QuizQuestion::new(
                "Who regulates the Indian stock market?",
                ["RBI", "SEBI", "IRDA", "NSE"],
                1,
                "SEBI regulates the Indian stock market.",
            ),
            QuizQuestion::new(
                "What is a share price?",
                ["Company profit", "Price of one unit of stock", "Dividend amount", "Market cap"],
                1,
                "Share price is the value of one stock unit.",
            ),
            QuizQuestion::new(
                "What is IPO?",
                [
                    "Initial Public Offering",
                    "Indian Price Option",
                    "Internal Purchase Order",
                    "None",
                ],
                0,
                "IPO is when a company offers shares to the public.",
            ),
        ],
        LearningMode::Intermediate => vec![
            QuizQuestion::new(
                "What is diversification?",
                ["Buying one stock", "Spreading investments", "Day trading", "Selling stocks"],
                1,
                "Diversification reduces risk.",
            ),
            QuizQuestion::new(
                "What is a blue-chip stock?",
                ["Penny stock", "Large, stable company stock", "New IPO", "Loss-making company"],
                1,
                "Blue-chip stocks are financially stable companies.",
            ),
            QuizQuestion::new(
                "What is a dividend?",
                ["Company debt", "Shareholder profit distribution", "Stock price", "Broker fee"],
                1,
                "Dividend is profit shared with shareholders.",
            ),
        ],
        LearningMode::Advanced => vec![
            QuizQuestion::new(
                "What is market capitalization?",
                ["Company profit", "Stock price × shares outstanding", "Annual revenue", "Debt"],
                1,
                "Market cap shows company value.",
            ),
            QuizQuestion::new(
                "What is P/E ratio?",
                ["Profit to Expense", "Price to Earnings", "Price to Equity", "None"],
                1,
                "P/E compares stock price with earnings.",
            ),
            QuizQuestion::new(
                "What is short selling?",
                ["Buying low", "Selling borrowed shares", "Holding stocks", "Dividend investing"],
                1,
                "Short selling profits from price decline.",
            ),
        ],
    }
}

/// Number of `answers` matching their question's correct option. Missing
/// answers count as wrong.
pub fn score(questions: &[QuizQuestion], answers: &[usize]) -> usize {
    questions
        .iter()
        .zip(answers)
        .filter(|(q, a)| q.is_correct(**a))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bank_sizes() {
        assert_eq!(questions_for_level("beginner").len(), 5);
        assert_eq!(questions_for_level("intermediate").len(), 3);
        assert_eq!(questions_for_level("advanced").len(), 3);
    }

    #[test]
    fn unknown_level_is_empty() {
        assert!(questions_for_level("legendary").is_empty());
        assert!(questions_for_level("").is_empty());
    }

    #[test]
    fn correct_index_is_in_range() {
        for mode in [LearningMode::Beginner, LearningMode::Intermediate, LearningMode::Advanced] {
            for q in questions_for(mode) {
                assert!(q.correct < q.options.len(), "{}", q.question);
            }
        }
    }

    #[test]
    fn scoring() {
        let qs = questions_for(LearningMode::Advanced);
        assert_eq!(score(&qs, &[1, 1, 1]), 3);
        assert_eq!(score(&qs, &[0, 1]), 1);
        assert_eq!(score(&qs, &[]), 0);
    }

    #[test]
    fn serialises_with_options_array() {
        let q = &questions_for(LearningMode::Beginner)[0];
        let json = serde_json::to_value(q).unwrap();
        assert_eq!(json["options"].as_array().unwrap().len(), 4);
        assert_eq!(json["correct"], 1);
    }
}
