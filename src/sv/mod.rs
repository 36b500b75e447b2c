pub mod course;
pub mod enrollment;
pub mod entitlement;
pub mod live_class;
pub mod payment;
pub mod plan;
pub mod preview;
pub mod recording;
pub mod subscription;
#[cfg(test)]
pub mod test_utils;
pub mod trial;
pub mod user;

pub use course::Course;
pub use enrollment::Enrollment;
pub use entitlement::Entitlement;
pub use live_class::LiveClass;
pub use payment::Payment;
pub use plan::Plan;
pub use preview::Preview;
pub use recording::Recording;
pub use subscription::Subscription;
pub use trial::TrialGrant;
pub use user::User;
