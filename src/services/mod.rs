pub mod topup;

pub use topup::TopUpService;
