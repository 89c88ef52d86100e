pub mod firestore_client;
pub mod google_http;
pub mod pubsub_client;
pub mod sheets_client;

pub use firestore_client::FirestoreStatusStore;
pub use google_http::{load_access_token, GoogleHttp};
pub use pubsub_client::PubSubClient;
pub use sheets_client::{column_letter, GoogleSheet};
