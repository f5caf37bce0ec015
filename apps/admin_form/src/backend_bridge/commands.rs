//! Backend commands queued from UI to backend worker.

use cascade::LookupTicket;

pub enum BackendCommand {
    Lookup(LookupTicket),
    Shutdown,
}
