mod corrections;
mod corrections_db;
mod corrections_mem;
mod identity;
mod identity_db;
mod identity_mem;

pub use corrections_db::CorrectionRepository;
pub use corrections_mem::MemoryCorrectionLog;
pub use identity_db::IdentityRepository;
pub use identity_mem::MemoryIdentityStore;

pub use corrections::CorrectionRepo;
pub use identity::IdentityRepo;
