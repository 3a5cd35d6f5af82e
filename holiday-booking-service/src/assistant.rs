use async_trait::async_trait;
use dashmap::DashMap;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::debug;

use crate::models::{DocPages, InteractRequest};

const MAX_PASSAGES_PER_ANSWER: usize = 2;

const FALLBACK_ANSWER: &str = "I can help you book a holiday, explain our travel insurance or \
walk you through the cancellation policy. What would you like to do?";

/// A page of a document an answer was drawn from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Citation {
    pub doc_name: String,
    pub page: u32,
}

#[derive(Debug, Clone)]
pub struct Answer {
    pub text: String,
    pub citations: Vec<Citation>,
}

/// Produces the assistant's reply for `/interact`
#[async_trait]
pub trait Responder: Send + Sync {
    async fn respond(&self, request: &InteractRequest) -> anyhow::Result<Answer>;
}

#[derive(Debug, Clone)]
pub struct Passage {
    pub doc_name: &'static str,
    pub page: u32,
    pub keywords: &'static [&'static str],
    pub text: &'static str,
}

/// The holiday desk's reference documents, one passage per page
pub fn holiday_desk_passages() -> Vec<Passage> {
    vec![
        Passage {
            doc_name: "holiday_booking_guide.pdf",
            page: 1,
            keywords: &["book", "booking", "holiday", "reserve", "trip"],
            text: "To book a holiday, send your name, country of birth and age under one \
                   request_id. Anything missing will be asked for, one question at a time.",
        },
        Passage {
            doc_name: "holiday_booking_guide.pdf",
            page: 2,
            keywords: &["status", "confirmation", "confirm", "id", "reference"],
            text: "Once every detail is collected you receive a booking_id. Sending the same \
                   request_id again returns the same booking and cannot change it.",
        },
        Passage {
            doc_name: "travel_insurance_policy.pdf",
            page: 1,
            keywords: &["insurance", "insured", "cover", "coverage", "older", "senior"],
            text: "Travellers over 50 are asked whether they need travel insurance before a \
                   booking is confirmed. Younger travellers may add it at any time.",
        },
        Passage {
            doc_name: "travel_insurance_policy.pdf",
            page: 3,
            keywords: &["claim", "medical", "emergency", "hospital", "lost"],
            text: "Insurance claims must be filed within 30 days of your return, together \
                   with receipts and any medical reports.",
        },
        Passage {
            doc_name: "cancellation_policy.pdf",
            page: 2,
            keywords: &["cancel", "cancellation", "refund", "change", "reschedule"],
            text: "Bookings cancelled more than 14 days before departure are refunded in full. \
                   Later cancellations are refunded at 50%.",
        },
        Passage {
            doc_name: "destinations_catalogue.pdf",
            page: 4,
            keywords: &["destination", "destinations", "country", "countries", "visa", "where"],
            text: "We arrange holidays for travellers from most countries. A booking naming an \
                   unsupported country is rejected when it is submitted.",
        },
    ]
}

/// Answers by matching message words against a fixed set of passages
pub struct KnowledgeBaseResponder {
    passages: Vec<Passage>,
}

impl KnowledgeBaseResponder {
    pub fn new(passages: Vec<Passage>) -> Self {
        Self { passages }
    }

    pub fn holiday_desk() -> Self {
        Self::new(holiday_desk_passages())
    }

    fn rank(&self, words: &BTreeSet<String>) -> Vec<&Passage> {
        let mut scored: Vec<(usize, usize, &Passage)> = self
            .passages
            .iter()
            .enumerate()
            .map(|(idx, p)| {
                let hits = p.keywords.iter().filter(|k| words.contains(**k)).count();
                (hits, idx, p)
            })
            .filter(|(hits, _, _)| *hits > 0)
            .collect();
        // highest score first, ties keep catalogue order
        scored.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
        scored
            .into_iter()
            .take(MAX_PASSAGES_PER_ANSWER)
            .map(|(_, _, p)| p)
            .collect()
    }
}

fn words_of<'a>(texts: impl IntoIterator<Item = &'a str>) -> BTreeSet<String> {
    texts
        .into_iter()
        .flat_map(|t| t.split(|c: char| !c.is_alphanumeric()))
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

#[async_trait]
impl Responder for KnowledgeBaseResponder {
    async fn respond(&self, request: &InteractRequest) -> anyhow::Result<Answer> {
        let words = words_of(
            std::iter::once(request.message.as_str())
                .chain(request.topics.iter().map(String::as_str)),
        );
        let passages = self.rank(&words);
        debug!(user_id = %request.user_id, matched = passages.len(), "answering message");

        if passages.is_empty() {
            return Ok(Answer {
                text: FALLBACK_ANSWER.to_string(),
                citations: Vec::new(),
            });
        }

        let text = passages
            .iter()
            .map(|p| p.text.split_whitespace().collect::<Vec<_>>().join(" "))
            .collect::<Vec<_>>()
            .join(" ");
        let citations = passages
            .iter()
            .map(|p| Citation {
                doc_name: p.doc_name.to_string(),
                page: p.page,
            })
            .collect();
        Ok(Answer { text, citations })
    }
}

/// Document pages cited to each user
#[derive(Default)]
pub struct CitationLog {
    by_user: Arc<DashMap<String, BTreeMap<String, BTreeSet<u32>>>>,
}

impl CitationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, user_id: &str, citations: &[Citation]) {
        if citations.is_empty() {
            return;
        }
        let mut docs = self.by_user.entry(user_id.to_string()).or_default();
        for citation in citations {
            docs.entry(citation.doc_name.clone())
                .or_default()
                .insert(citation.page);
        }
    }

    /// Cited documents sorted by name, each with its sorted distinct pages
    pub fn doc_pages(&self, user_id: &str) -> Vec<DocPages> {
        self.by_user
            .get(user_id)
            .map(|docs| {
                docs.iter()
                    .map(|(doc_name, pages)| DocPages {
                        doc_name: doc_name.clone(),
                        pages: pages.iter().copied().collect(),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}
