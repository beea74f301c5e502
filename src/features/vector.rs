/// A dense feature vector, one column per vocabulary entry
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector(Vec<f32>);

impl FeatureVector {
    /// The all-zero vector of the given dimension
    pub fn zeros(dim: usize) -> Self {
        Self(vec![0.0; dim])
    }

    /// Number of columns
    pub fn dim(&self) -> usize {
        self.0.len()
    }

    /// Column values
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    /// True when every column is zero, e.g. for text without any known term
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|value| *value == 0.0)
    }
}

impl From<Vec<f32>> for FeatureVector {
    fn from(values: Vec<f32>) -> Self {
        Self(values)
    }
}
