pub mod cash;
pub mod checkin;
pub mod employee;
pub mod loan;
pub mod payroll;
