use crate::api::cash::{CreateCashEntry, PresetQuery};
use crate::api::checkin::{CheckinDraft, CloseWeekRequest, CloseWeekSummary, CreateCheckins};
use crate::api::employee::CreateEmployee;
use crate::api::loan::CreateLoan;
use crate::api::payroll::{CreateBatch, ExportQuery, Metrics, MetricsQuery, PreviewRequest};
use crate::calc::aggregate::{NameTotal, WeekEmployeeSummary};
use crate::calc::autocalc::AutoCalcSettings;
use crate::calc::payroll::{PayrollBatch, PayrollDraftRow, PayrollEmployeeRecord};
use crate::model::cash::CashLedgerEntry;
use crate::model::checkin::CheckinEntry;
use crate::model::employee::Employee;
use crate::model::loan::Loan;
use crate::model::payroll::PayrollBatchRow;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Nominas API",
        version = "1.0.0",
        description = r#"
## Payroll & Workforce Management

Backend for a small internal business-management tool: weekly payroll
capture, employee records, loan tracking, daily check-ins and a
cash-denomination ledger.

### 🔹 Key Features
- **Employees**
  - Create, update, list and delete employee records
- **Loans**
  - Track per-employee loans
- **Payroll**
  - Store derived weekly batches, preview derivation server-side,
    aggregate metrics and CSV export
- **Check-ins**
  - Bulk daily check-in capture with derived worked hours, week close summary
- **Cash Ledger**
  - Denomination-count entries with recomputed totals

### 📦 Response Format
- JSON-based RESTful responses
- Non-2xx responses carry `{"error": "<message>"}`

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::employee::create_employee,
        crate::api::employee::list_employees,
        crate::api::employee::get_employee,
        crate::api::employee::update_employee,
        crate::api::employee::delete_employee,

        crate::api::loan::list_loans,
        crate::api::loan::create_loan,
        crate::api::loan::delete_loan,

        crate::api::payroll::list_batches,
        crate::api::payroll::create_batch,
        crate::api::payroll::preview_batch,
        crate::api::payroll::batch_metrics,
        crate::api::payroll::export_batches,

        crate::api::checkin::list_checkins,
        crate::api::checkin::create_checkins,
        crate::api::checkin::close_week,

        crate::api::cash::list_entries,
        crate::api::cash::create_entry,
        crate::api::cash::preset,
        crate::api::cash::delete_entry
    ),
    components(
        schemas(
            Employee,
            CreateEmployee,
            Loan,
            CreateLoan,
            PayrollDraftRow,
            PayrollEmployeeRecord,
            PayrollBatch,
            PayrollBatchRow,
            AutoCalcSettings,
            CreateBatch,
            PreviewRequest,
            MetricsQuery,
            Metrics,
            ExportQuery,
            NameTotal,
            CheckinEntry,
            CheckinDraft,
            CreateCheckins,
            CloseWeekRequest,
            CloseWeekSummary,
            WeekEmployeeSummary,
            CashLedgerEntry,
            CreateCashEntry,
            PresetQuery
        )
    ),
    tags(
        (name = "Employees", description = "Employee record APIs"),
        (name = "Loans", description = "Loan tracking APIs"),
        (name = "Payroll", description = "Payroll batch APIs"),
        (name = "Checkins", description = "Daily check-in APIs"),
        (name = "CashLedger", description = "Cash-denomination ledger APIs"),
    )
)]
pub struct ApiDoc;
