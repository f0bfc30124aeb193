//! Thematic paragraph clustering: TF-IDF vectors grouped with k-means.

use std::collections::{BTreeMap, HashMap};

use resume_core::text_utils::{is_stopword, paragraphs};
use resume_core::{CapabilityError, ClusterAssignment, Clusterer};
use resume_parsing::tagger;

use crate::DiscoveryError;

const MAX_CLUSTERS: usize = 5;
const LABEL_TERMS: usize = 3;

/// Lowercased content words of a document, stopwords removed.
pub(crate) fn content_words(text: &str) -> Vec<String> {
    tagger::tokenize(text)
        .into_iter()
        .filter(|t| t.chars().next().is_some_and(char::is_alphabetic) && t.chars().count() > 1)
        .map(str::to_lowercase)
        .filter(|t| !is_stopword(t))
        .collect()
}

/// TF-IDF over unigrams and bigrams followed by k-means++ / Lloyd's
/// iterations. The best of `restarts` runs (lowest inertia) is kept.
/// Deterministic for a given seed.
#[derive(Debug, Clone)]
pub struct TfIdfKMeans {
    pub max_features: usize,
    pub max_iterations: usize,
    pub restarts: usize,
    pub seed: u64,
}

impl Default for TfIdfKMeans {
    fn default() -> Self {
        Self {
            max_features: 100,
            max_iterations: 300,
            restarts: 10,
            seed: 42,
        }
    }
}

impl TfIdfKMeans {
    /// Row-normalized TF-IDF matrix and its feature names.
    fn vectorize(&self, documents: &[&str]) -> (Vec<Vec<f64>>, Vec<String>) {
        let docs: Vec<Vec<String>> = documents
            .iter()
            .map(|d| {
                let words = content_words(d);
                let mut features = words.clone();
                features.extend(words.windows(2).map(|w| format!("{} {}", w[0], w[1])));
                features
            })
            .collect();

        let mut total: HashMap<&str, usize> = HashMap::new();
        for doc in &docs {
            for f in doc {
                *total.entry(f.as_str()).or_default() += 1;
            }
        }
        let mut vocab: Vec<(&str, usize)> = total.into_iter().collect();
        vocab.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        vocab.truncate(self.max_features);
        let mut features: Vec<String> = vocab.iter().map(|(f, _)| f.to_string()).collect();
        features.sort();
        let index: HashMap<&str, usize> = features
            .iter()
            .enumerate()
            .map(|(i, f)| (f.as_str(), i))
            .collect();

        let n = docs.len() as f64;
        let mut df = vec![0usize; features.len()];
        let mut counts = vec![vec![0f64; features.len()]; docs.len()];
        for (d, doc) in docs.iter().enumerate() {
            for f in doc {
                if let Some(&j) = index.get(f.as_str()) {
                    if counts[d][j] == 0.0 {
                        df[j] += 1;
                    }
                    counts[d][j] += 1.0;
                }
            }
        }

        let idf: Vec<f64> = df
            .iter()
            .map(|&count| ((1.0 + n) / (1.0 + count as f64)).ln() + 1.0)
            .collect();
        for row in &mut counts {
            for (x, w) in row.iter_mut().zip(&idf) {
                *x *= w;
            }
            let norm = row.iter().map(|x| x * x).sum::<f64>().sqrt();
            if norm > 0.0 {
                row.iter_mut().for_each(|x| *x /= norm);
            }
        }
        (counts, features)
    }

    fn kmeans(&self, rows: &[Vec<f64>], k: usize) -> (Vec<usize>, Vec<Vec<f64>>) {
        let mut rng = fastrand::Rng::with_seed(self.seed);
        let mut best: Option<(f64, Vec<usize>, Vec<Vec<f64>>)> = None;
        for _ in 0..self.restarts.max(1) {
            let (assignments, centroids) = self.lloyd(rows, k, &mut rng);
            let inertia: f64 = rows
                .iter()
                .zip(&assignments)
                .map(|(r, &c)| squared_distance(r, &centroids[c]))
                .sum();
            if best.as_ref().is_none_or(|(b, _, _)| inertia < *b) {
                best = Some((inertia, assignments, centroids));
            }
        }
        best.map(|(_, a, c)| (a, c)).unwrap_or_default()
    }

    fn lloyd(&self, rows: &[Vec<f64>], k: usize, rng: &mut fastrand::Rng) -> (Vec<usize>, Vec<Vec<f64>>) {
        let mut centroids = init_plus_plus(rows, k, rng);
        let mut assignments = vec![usize::MAX; rows.len()];

        for _ in 0..self.max_iterations.max(1) {
            let next: Vec<usize> = rows.iter().map(|r| nearest(r, &centroids).0).collect();
            if next == assignments {
                break;
            }
            assignments = next;

            for (c, centroid) in centroids.iter_mut().enumerate() {
                let members: Vec<&Vec<f64>> = rows
                    .iter()
                    .zip(&assignments)
                    .filter(|(_, a)| **a == c)
                    .map(|(r, _)| r)
                    .collect();
                // Empty clusters keep their previous centroid.
                if members.is_empty() {
                    continue;
                }
                for (j, value) in centroid.iter_mut().enumerate() {
                    *value = members.iter().map(|m| m[j]).sum::<f64>() / members.len() as f64;
                }
            }
        }
        (assignments, centroids)
    }
}

fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

fn nearest(row: &[f64], centroids: &[Vec<f64>]) -> (usize, f64) {
    centroids
        .iter()
        .enumerate()
        .map(|(i, c)| (i, squared_distance(row, c)))
        .fold((0, f64::INFINITY), |best, cur| if cur.1 < best.1 { cur } else { best })
}

fn init_plus_plus(rows: &[Vec<f64>], k: usize, rng: &mut fastrand::Rng) -> Vec<Vec<f64>> {
    let mut centroids = vec![rows[rng.usize(..rows.len())].clone()];
    while centroids.len() < k {
        let weights: Vec<f64> = rows.iter().map(|r| nearest(r, &centroids).1).collect();
        let total: f64 = weights.iter().sum();
        let pick = if total <= 0.0 {
            rng.usize(..rows.len())
        } else {
            let mut target = rng.f64() * total;
            let mut chosen = rows.len() - 1;
            for (i, w) in weights.iter().enumerate() {
                if target < *w {
                    chosen = i;
                    break;
                }
                target -= w;
            }
            chosen
        };
        centroids.push(rows[pick].clone());
    }
    centroids
}

impl Clusterer for TfIdfKMeans {
    fn name(&self) -> &str {
        "tfidf-kmeans"
    }

    fn cluster(&self, documents: &[&str], k: usize) -> Result<ClusterAssignment, CapabilityError> {
        if k == 0 || documents.len() < k {
            return Err(CapabilityError::InsufficientInput(format!(
                "{} documents for {} clusters",
                documents.len(),
                k
            )));
        }
        let (rows, features) = self.vectorize(documents);
        if features.is_empty() {
            return Err(CapabilityError::InsufficientInput(
                "no content words after stopword removal".to_string(),
            ));
        }

        let (assignments, centroids) = self.kmeans(&rows, k);
        let cluster_terms = centroids
            .iter()
            .map(|centroid| {
                let mut ranked: Vec<(usize, f64)> = centroid
                    .iter()
                    .copied()
                    .enumerate()
                    .filter(|(_, w)| *w > 0.0)
                    .collect();
                ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
                ranked
                    .into_iter()
                    .take(LABEL_TERMS)
                    .map(|(j, _)| features[j].clone())
                    .collect()
            })
            .collect();

        Ok(ClusterAssignment {
            assignments,
            cluster_terms,
        })
    }
}

/// Number of clusters for `n` paragraphs: `min(5, n - 1)` clamped to 2..=5.
pub fn cluster_count(n: usize) -> usize {
    n.saturating_sub(1).clamp(2, MAX_CLUSTERS)
}

/// Group qualifying paragraphs by cluster, labeled with each cluster's top
/// centroid terms.
pub fn cluster_content(
    text: &str,
    clusterer: &dyn Clusterer,
    min_paragraph_chars: usize,
    min_paragraphs: usize,
) -> Result<BTreeMap<String, Vec<String>>, DiscoveryError> {
    let paras = paragraphs(text, min_paragraph_chars);
    if paras.len() < min_paragraphs {
        return Err(DiscoveryError::InsufficientInput(format!(
            "{} paragraphs, need {}",
            paras.len(),
            min_paragraphs
        )));
    }

    let refs: Vec<&str> = paras.iter().map(String::as_str).collect();
    let k = cluster_count(refs.len());
    let result = clusterer.cluster(&refs, k)?;

    let mut labels: Vec<String> = Vec::with_capacity(k);
    for (i, terms) in result.cluster_terms.iter().enumerate() {
        let mut label = if terms.is_empty() {
            format!("cluster {}", i + 1)
        } else {
            terms.join(", ")
        };
        if labels.contains(&label) {
            label = format!("{label} ({})", i + 1);
        }
        labels.push(label);
    }

    let mut clusters: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (para, &cluster) in paras.into_iter().zip(&result.assignments) {
        let label = labels
            .get(cluster)
            .cloned()
            .unwrap_or_else(|| format!("cluster {}", cluster + 1));
        clusters.entry(label).or_default().push(para);
    }
    Ok(clusters)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCS: &[&str] = &[
        "Rust systems programming with async networking and memory safety",
        "Async networking services written in Rust with memory safety guarantees",
        "Watercolor painting and portrait sketching in the studio",
        "Portrait sketching and watercolor painting classes for adults",
    ];

    #[test]
    fn test_cluster_count_bounds() {
        assert_eq!(cluster_count(3), 2);
        assert_eq!(cluster_count(4), 3);
        assert_eq!(cluster_count(6), 5);
        assert_eq!(cluster_count(40), 5);
    }

    #[test]
    fn test_similar_documents_share_a_cluster() {
        let result = TfIdfKMeans::default().cluster(DOCS, 2).unwrap();
        assert_eq!(result.assignments.len(), 4);
        assert_eq!(result.assignments[0], result.assignments[1]);
        assert_eq!(result.assignments[2], result.assignments[3]);
        assert_ne!(result.assignments[0], result.assignments[2]);
        assert!(result.cluster_terms.iter().all(|t| !t.is_empty() && t.len() <= 3));
    }

    #[test]
    fn test_deterministic() {
        let a = TfIdfKMeans::default().cluster(DOCS, 2).unwrap();
        let b = TfIdfKMeans::default().cluster(DOCS, 2).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_too_few_documents() {
        let result = TfIdfKMeans::default().cluster(&DOCS[..1], 2);
        assert!(matches!(result, Err(CapabilityError::InsufficientInput(_))));
    }

    #[test]
    fn test_cluster_content_requires_paragraphs() {
        let clusterer = TfIdfKMeans::default();
        let result = cluster_content("short\n\nparagraphs", &clusterer, 50, 3);
        assert!(matches!(result, Err(DiscoveryError::InsufficientInput(_))));
    }

    #[test]
    fn test_cluster_content_groups_all_paragraphs() {
        let text = DOCS.join("\n\n");
        let clusters = cluster_content(&text, &TfIdfKMeans::default(), 50, 3).unwrap();
        let total: usize = clusters.values().map(Vec::len).sum();
        assert_eq!(total, 4);
        assert!(clusters.len() >= 2 && clusters.len() <= 3, "{:?}", clusters.keys());
    }
}
