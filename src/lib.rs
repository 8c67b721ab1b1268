//! __conicls__ solves conic programs
//!
//! $$
//! \begin{array}{rl}
//! \text{minimize} & c^T x\\\\\[2ex\]
//!  \text{subject to} & Ax + s = b \\\\\[1ex\]
//!         & s \in \mathcal{K}
//!  \end{array}
//! $$
//!
//! with decision variables $x \in \mathbb{R}^n$, $s \in \mathbb{R}^m$, data
//! $A \in \mathbb{R}^{m \times n}$, $b \in \mathbb{R}^m$, $c \in \mathbb{R}^n$,
//! and $\mathcal{K}$ a product of zero cones, nonnegative cones and
//! elementwise scaled second-order cones.
//!
//! Rather than following a central path, the primal-dual optimality
//! conditions are rewritten as a smooth unconstrained least squares loss.
//! The loss is minimized by a matrix-free Newton-CG method, optionally over
//! a nullspace parametrization of the dual equality constraints, and the
//! result is polished by an iterative refinement over the homogeneous
//! self-dual embedding.
//!
//! ```no_run
//! use conicls::algebra::*;
//! use conicls::solver::*;
//!
//! // maximize x1 + x2 subject to x1 + 2*x2 <= 2, 3*x1 + x2 <= 3, x >= 0
//! let A = CscMatrix::from(&[[1., 2.], [3., 1.], [-1., 0.], [0., -1.]]);
//! let b = vec![2., 3., 0., 0.];
//! let c = vec![-1., -1.];
//! let cones = [NonnegativeConeT(4)];
//!
//! let settings = DefaultSettings::default();
//! let mut solver = DefaultSolver::new(&A, &b, &c, &cones, settings).unwrap();
//! solver.solve().unwrap();
//! println!("x = {:?}", solver.solution.x);
//! ```
//!
//! # License
//!
//! Licensed under Apache License, Version 2.0.

//Rust hates greek characters
#![allow(confusable_idents)]

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod algebra;
pub(crate) mod io;
pub mod solver;
pub mod timers;
