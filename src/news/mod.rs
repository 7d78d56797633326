//! News articles delivered by the workflows.
//!
//! This module provides:
//! - The article model and validation of webhook records ([`NewsArticle`])
//! - Importance grades users attach to articles ([`Grade`], [`GradeSelection`])
//! - The client-side date/grade/search filter ([`ArticleFilter`])

mod article;
mod filter;
mod grade;


pub use article::{NewsArticle, apply_grade, articles_from_value};
pub use filter::ArticleFilter;
pub use grade::{Grade, GradeSelection, InvalidGrade};
