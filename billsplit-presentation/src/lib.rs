#![warn(clippy::uninlined_format_args)]

pub mod currency;
pub mod error_presenter;
pub mod report_presenter;
pub mod statement_presenter;
pub mod text_table;

pub use currency::{format_amount, format_signed_amount};
pub use error_presenter::format_service_error;
pub use report_presenter::{ReportPresenter, ReportView};
pub use statement_presenter::StatementPresenter;
