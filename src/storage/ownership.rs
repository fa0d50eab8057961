// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Creator tracking for owner-or-admin mutations.

/// Trait for rows that record the user who created them.
pub trait OwnedResource {
    /// User ID of the creator.
    fn creator_id(&self) -> i64;

    /// Whether `user_id` created this row.
    fn is_created_by(&self, user_id: i64) -> bool {
        self.creator_id() == user_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestResource {
        creator: i64,
    }

    impl OwnedResource for TestResource {
        fn creator_id(&self) -> i64 {
            self.creator
        }
    }

    #[test]
    fn creator_matches_only_its_own_id() {
        let resource = TestResource { creator: 7 };
        assert!(resource.is_created_by(7));
        assert!(!resource.is_created_by(8));
    }
}
