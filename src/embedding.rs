use async_trait::async_trait;

pub type Embedding = Vec<f32>;

/// Something that turns a piece of text into an [`Embedding`].
///
/// Timeouts and retries are up to the implementation; callers await the
/// result as-is.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, text: &str) -> anyhow::Result<Embedding>;
}

/// Stands in for a provider that could not be built. Every call fails with
/// the setup error, so the failure is reported like any other.
#[derive(Debug)]
pub struct UnavailableProvider {
    reason: String,
}

impl UnavailableProvider {
    pub fn new(err: anyhow::Error) -> Self {
        UnavailableProvider {
            reason: format!("{:#}", err),
        }
    }
}

#[async_trait]
impl EmbeddingProvider for UnavailableProvider {
    async fn embed(&self, _text: &str) -> anyhow::Result<Embedding> {
        Err(anyhow::anyhow!("{}", self.reason))
    }
}

/// Returns the same vector for every input. Never touches the network.
#[cfg(test)]
#[derive(Debug, Clone)]
pub(crate) struct FakeEmbeddingProvider {
    pub dims: usize,
    pub value: f32,
}

#[cfg(test)]
impl Default for FakeEmbeddingProvider {
    fn default() -> Self {
        FakeEmbeddingProvider {
            dims: 5,
            value: 0.32,
        }
    }
}

#[cfg(test)]
#[async_trait]
impl EmbeddingProvider for FakeEmbeddingProvider {
    async fn embed(&self, text: &str) -> anyhow::Result<Embedding> {
        log::debug!("fake embedding for {:?}", text);
        anyhow::Ok(vec![self.value; self.dims])
    }
}
