//! Migration topology.
//!
//! A static directed graph over the islands, built once at initialization.
//! `matrix[i][j]` means island `i` may send migrants to island `j`.
//!
//! # Reference
//! Cantú-Paz (2000), "Efficient and Accurate Parallel Genetic Algorithms",
//! Ch. 5 (communication topologies)

use serde::{Deserialize, Serialize};

/// Connection structure between islands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MigrationTopology {
    /// Each island connects to both neighbours on a cycle.
    #[default]
    Ring,
    /// Every ordered pair of distinct islands is connected.
    FullyConnected,
    /// Island 0 is the hub; every other island exchanges with it only.
    Star,
    /// Islands arranged in a ⌊√K⌋ × ⌊√K⌋ row-major grid with orthogonal
    /// neighbours and no wrap-around; islands beyond the grid stay isolated.
    Mesh,
}

impl MigrationTopology {
    /// Builds the K×K adjacency matrix for `islands` islands.
    ///
    /// A single island yields an empty topology — migration becomes a no-op.
    pub fn build(self, islands: usize) -> Vec<Vec<bool>> {
        let mut matrix = vec![vec![false; islands]; islands];
        if islands <= 1 {
            return matrix;
        }

        match self {
            MigrationTopology::Ring => {
                for i in 0..islands {
                    matrix[i][(i + 1) % islands] = true;
                    matrix[i][(i + islands - 1) % islands] = true;
                }
            }
            MigrationTopology::FullyConnected => {
                for i in 0..islands {
                    for j in 0..islands {
                        if i != j {
                            matrix[i][j] = true;
                        }
                    }
                }
            }
            MigrationTopology::Star => {
                for i in 1..islands {
                    matrix[0][i] = true;
                    matrix[i][0] = true;
                }
            }
            MigrationTopology::Mesh => {
                let side = (islands as f64).sqrt().floor() as usize;
                for i in 0..side * side {
                    let row = i / side;
                    let col = i % side;
                    if row > 0 {
                        matrix[i][i - side] = true;
                    }
                    if row + 1 < side {
                        matrix[i][i + side] = true;
                    }
                    if col > 0 {
                        matrix[i][i - 1] = true;
                    }
                    if col + 1 < side {
                        matrix[i][i + 1] = true;
                    }
                }
            }
        }

        matrix
    }
}
