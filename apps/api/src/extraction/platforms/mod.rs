//! One module per platform. API-backed platforms expose an adapter struct;
//! rendered platforms expose their URL, rules and an `adapter` constructor.

pub mod codechef;
pub mod devpost;
pub mod devto;
pub mod geeksforgeeks;
pub mod github;
pub mod hackerrank;
pub mod leetcode;
pub mod linkedin;
