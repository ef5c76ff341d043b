use crate::error::EmbedError;

pub const DEFAULT_EMBEDDING_DIMENSIONS: usize = 384;

/// Model identifier the pipeline uses when the configuration names none.
pub const DEFAULT_MODEL: &str = "hashed-ngram-384";

/// A pretrained embedding model: maps a string to a fixed-length vector,
/// deterministically for a given model identifier and input.
pub trait Embedder {
    fn model_id(&self) -> &str;
    fn dimensions(&self) -> usize;
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError>;
}

/// Resolves a configured model identifier. Identifiers follow
/// `hashed-ngram-<dimensions>`; anything else is rejected.
pub fn embedder_for_model(model: &str) -> Result<Box<dyn Embedder>, EmbedError> {
    match model.strip_prefix("hashed-ngram-") {
        Some(dims) => {
            let dimensions: usize = dims
                .parse()
                .map_err(|_| EmbedError::UnknownModel(model.to_string()))?;
            if dimensions == 0 {
                return Err(EmbedError::UnknownModel(model.to_string()));
            }
            Ok(Box::new(HashedNgramEmbedder::new(dimensions)))
        }
        None => Err(EmbedError::UnknownModel(model.to_string())),
    }
}

/// Character-trigram feature hashing into an L2-normalized vector. Local,
/// deterministic, and dimension-stable, so repeated runs over the same
/// corpus are bitwise identical.
#[derive(Debug, Clone)]
pub struct HashedNgramEmbedder {
    dimensions: usize,
    model_id: String,
}

impl HashedNgramEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
            model_id: format!("hashed-ngram-{}", dimensions.max(1)),
        }
    }
}

impl Default for HashedNgramEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_EMBEDDING_DIMENSIONS)
    }
}

impl Embedder for HashedNgramEmbedder {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
        let mut vector = vec![0f32; self.dimensions];
        let lowered = text.to_lowercase();
        let chars: Vec<char> = lowered.chars().collect();

        if chars.is_empty() {
            return Ok(vector);
        }

        for window in chars.windows(3.min(chars.len())) {
            let token: String = window.iter().collect();
            let bucket = (fnv1a(token.as_bytes()) % vector.len() as u64) as usize;
            vector[bucket] += 1.0;
        }

        let magnitude = vector.iter().map(|value| value * value).sum::<f32>().sqrt();
        if magnitude > 0.0 {
            for value in &mut vector {
                *value /= magnitude;
            }
        }

        Ok(vector)
    }
}

fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash = 0xcbf29ce484222325u64;
    for byte in bytes {
        hash ^= *byte as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}
