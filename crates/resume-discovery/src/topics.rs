use std::collections::BTreeMap;

use resume_core::text_utils::paragraphs;
use resume_core::{CapabilityError, Topic, TopicModeler};

use crate::DiscoveryError;
use crate::clustering::content_words;

const MAX_TOPICS: usize = 3;

/// Latent Dirichlet allocation fitted with collapsed Gibbs sampling.
///
/// Priors are symmetric, `alpha = eta = 1 / num_topics`. Deterministic for a
/// given seed.
#[derive(Debug, Clone)]
pub struct LdaTopicModeler {
    pub iterations: usize,
    pub terms_per_topic: usize,
    pub seed: u64,
}

impl Default for LdaTopicModeler {
    fn default() -> Self {
        Self {
            iterations: 200,
            terms_per_topic: 5,
            seed: 42,
        }
    }
}

impl TopicModeler for LdaTopicModeler {
    fn name(&self) -> &str {
        "lda-gibbs"
    }

    fn fit(&self, documents: &[Vec<String>], num_topics: usize) -> Result<Vec<Topic>, CapabilityError> {
        if num_topics == 0 {
            return Err(CapabilityError::InsufficientInput("zero topics requested".to_string()));
        }

        // Dictionary: word -> id, in sorted order for reproducibility.
        let dictionary: BTreeMap<&str, usize> = {
            let mut words: Vec<&str> = documents.iter().flatten().map(String::as_str).collect();
            words.sort_unstable();
            words.dedup();
            words.into_iter().enumerate().map(|(i, w)| (w, i)).collect()
        };
        if dictionary.is_empty() {
            return Err(CapabilityError::InsufficientInput("empty vocabulary".to_string()));
        }
        let vocab: Vec<&str> = dictionary.keys().copied().collect();
        let v = vocab.len();
        let k = num_topics;

        let corpus: Vec<Vec<usize>> = documents
            .iter()
            .map(|doc| doc.iter().filter_map(|w| dictionary.get(w.as_str()).copied()).collect())
            .collect();

        let alpha = 1.0 / k as f64;
        let eta = 1.0 / k as f64;
        let mut rng = fastrand::Rng::with_seed(self.seed);

        let mut doc_topic = vec![vec![0usize; k]; corpus.len()];
        let mut topic_word = vec![vec![0usize; v]; k];
        let mut topic_total = vec![0usize; k];
        let mut assignments: Vec<Vec<usize>> = Vec::with_capacity(corpus.len());

        for (d, doc) in corpus.iter().enumerate() {
            let mut z = Vec::with_capacity(doc.len());
            for &w in doc {
                let t = rng.usize(..k);
                doc_topic[d][t] += 1;
                topic_word[t][w] += 1;
                topic_total[t] += 1;
                z.push(t);
            }
            assignments.push(z);
        }

        let mut weights = vec![0f64; k];
        for _ in 0..self.iterations {
            for (d, doc) in corpus.iter().enumerate() {
                for (i, &w) in doc.iter().enumerate() {
                    let old = assignments[d][i];
                    doc_topic[d][old] -= 1;
                    topic_word[old][w] -= 1;
                    topic_total[old] -= 1;

                    let mut sum = 0.0;
                    for t in 0..k {
                        let p = (doc_topic[d][t] as f64 + alpha) * (topic_word[t][w] as f64 + eta)
                            / (topic_total[t] as f64 + v as f64 * eta);
                        sum += p;
                        weights[t] = sum;
                    }
                    let target = rng.f64() * sum;
                    let new = weights.iter().position(|&c| target < c).unwrap_or(k - 1);

                    assignments[d][i] = new;
                    doc_topic[d][new] += 1;
                    topic_word[new][w] += 1;
                    topic_total[new] += 1;
                }
            }
        }

        let topics = (0..k)
            .map(|t| {
                let mut ranked: Vec<usize> = (0..v).collect();
                // phi is monotone in the count for a fixed topic, so counts rank words.
                ranked.sort_by(|&a, &b| topic_word[t][b].cmp(&topic_word[t][a]).then_with(|| a.cmp(&b)));
                Topic {
                    id: t,
                    terms: ranked
                        .into_iter()
                        .take(self.terms_per_topic)
                        .map(|w| vocab[w].to_string())
                        .collect(),
                }
            })
            .collect();
        Ok(topics)
    }
}

/// Fit `min(3, paragraph_count)` topics over the qualifying paragraphs.
pub fn model_topics(
    text: &str,
    modeler: &dyn TopicModeler,
    min_paragraph_chars: usize,
    min_paragraphs: usize,
) -> Result<Vec<Topic>, DiscoveryError> {
    let paras = paragraphs(text, min_paragraph_chars);
    if paras.len() < min_paragraphs {
        return Err(DiscoveryError::InsufficientInput(format!(
            "{} paragraphs, need {}",
            paras.len(),
            min_paragraphs
        )));
    }
    let documents: Vec<Vec<String>> = paras.iter().map(|p| content_words(p)).collect();
    let num_topics = MAX_TOPICS.min(documents.len());
    Ok(modeler.fit(&documents, num_topics)?)
}
