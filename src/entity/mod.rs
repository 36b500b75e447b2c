pub mod course;
pub mod enrollment;
pub mod live_class;
pub mod plan;
pub mod recording;
pub mod resource;
pub mod subscription;
pub mod trial_grant;
pub mod user;

pub use enrollment::EnrollmentType;
pub use plan::PlanType;
pub use resource::ResourceType;
pub use subscription::SubscriptionStatus;
pub use user::UserRole;
