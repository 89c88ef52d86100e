pub mod chrome_session;
pub mod dom;
pub mod session;
pub mod sites;

pub use chrome_session::{ChromeSession, ChromeSessionFactory};
pub use session::{ExtractionSession, SessionFactory};
