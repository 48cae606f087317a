//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod agent;
pub mod attachment;
pub mod booking;
pub mod partner;
pub mod payout;
pub mod property;

// Re-export specific types to avoid conflicts
pub use agent::{AgentStatus, Column as AgentColumn, Entity as Agent, Model as AgentModel};
pub use attachment::{
    AttachmentStatus, Column as AttachmentColumn, Entity as Attachment, Model as AttachmentModel,
};
pub use booking::{BookingStatus, Column as BookingColumn, Entity as Booking, Model as BookingModel};
pub use partner::{
    Column as PartnerColumn, Entity as Partner, Model as PartnerModel, PartnerStatus,
};
pub use payout::{Column as PayoutColumn, Entity as Payout, Model as PayoutModel, PayoutStatus};
pub use property::{Column as PropertyColumn, Entity as Property, Model as PropertyModel};
