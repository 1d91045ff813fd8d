//! Explicit gravity-source sets: which bodies pull on which.

use thiserror::Error;

/// Errors raised when a source set does not describe the body collection it is used with.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SourceSetError {
    #[error("source sets describe {sets} bodies but the system has {bodies}")]
    LengthMismatch { sets: usize, bodies: usize },
    #[error("body {body} lists itself as a gravity source")]
    SelfReference { body: usize },
    #[error("body {body} references unknown source index {index}")]
    OutOfRange { body: usize, index: usize },
    #[error("body {body} lists source {index} more than once")]
    Duplicate { body: usize, index: usize },
}

/// Per-body lists of source indices, indexed like the body collection.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SourceSets {
    sets: Vec<Vec<usize>>,
}

impl SourceSets {
    /// Every body is attracted by every other body.
    pub fn complete(body_count: usize) -> Self {
        let sets = (0..body_count)
            .map(|body| (0..body_count).filter(|&other| other != body).collect())
            .collect();
        Self { sets }
    }

    /// Complete graph, except that the listed test particles never act as sources.
    ///
    /// Test particles are still attracted by every massive body.
    pub fn excluding_test_particles(body_count: usize, test_particles: &[usize]) -> Self {
        let sets = (0..body_count)
            .map(|body| {
                (0..body_count)
                    .filter(|&other| other != body && !test_particles.contains(&other))
                    .collect()
            })
            .collect();
        Self { sets }
    }

    pub fn from_sets(sets: Vec<Vec<usize>>) -> Self {
        Self { sets }
    }

    pub fn sources_of(&self, body: usize) -> &[usize] {
        self.sets.get(body).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Check the sets against a collection of `body_count` bodies.
    pub fn validate(&self, body_count: usize) -> Result<(), SourceSetError> {
        if self.sets.len() != body_count {
            return Err(SourceSetError::LengthMismatch {
                sets: self.sets.len(),
                bodies: body_count,
            });
        }
        for (body, set) in self.sets.iter().enumerate() {
            for (position, &index) in set.iter().enumerate() {
                if index == body {
                    return Err(SourceSetError::SelfReference { body });
                }
                if index >= body_count {
                    return Err(SourceSetError::OutOfRange { body, index });
                }
                if set[..position].contains(&index) {
                    return Err(SourceSetError::Duplicate { body, index });
                }
            }
        }
        Ok(())
    }
}
