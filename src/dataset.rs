/// Training examples as three parallel columns.
///
/// Row `i` is one example: the encoded position, the target move distribution
/// over the policy layout, and the target value from the side to move's point of view.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset<F> {
    pub positions: Vec<F>,
    pub policies: Vec<Vec<f32>>,
    pub values: Vec<f32>,
}

impl<F> Default for Dataset<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F> Dataset<F> {
    pub fn new() -> Self {
        Self {
            positions: Vec::new(),
            policies: Vec::new(),
            values: Vec::new(),
        }
    }

    pub fn push(&mut self, position: F, policy: Vec<f32>, value: f32) {
        self.positions.push(position);
        self.policies.push(policy);
        self.values.push(value);
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Appends every example of `other`.
    pub fn append(&mut self, other: Dataset<F>) {
        self.positions.extend(other.positions);
        self.policies.extend(other.policies);
        self.values.extend(other.values);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&F, &[f32], f32)> {
        self.positions
            .iter()
            .zip(&self.policies)
            .zip(&self.values)
            .map(|((position, policy), &value)| (position, policy.as_slice(), value))
    }
}
