//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod account;
pub mod balance;
pub mod boarding_house;
pub mod period;
pub mod posting;
pub mod reconciliation;
pub mod report;

pub use account::{AccountRepository, CoaError, CreateAccountInput, UpdateAccountInput};
pub use balance::{BalanceError, BalanceRepository};
pub use boarding_house::{
    BoardingHouseError, BoardingHouseRepository, CreateBoardingHouseInput,
};
pub use period::{PeriodError, PeriodRepository};
pub use posting::{
    PostTransactionInput, PostingError, PostingRepository, ReviseTransactionInput,
};
pub use reconciliation::{
    BankItemInput, CreateSessionInput, ReconciliationError, ReconciliationRepository,
};
pub use report::{AccountLedgerRow, ReportQueryError, ReportRepository};
