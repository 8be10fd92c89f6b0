/// Identifier of a post, issued by the external ID generator.
pub type PostId = i64;

/// Identifier of a registered user.
pub type UserId = i64;

/// Identifier of a community (the partition a post is created under).
pub type CommunityId = i64;
