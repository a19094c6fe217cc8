use dramsched_core::common::{DramCommand, TraceError};
use dramsched_core::trace::CommandSink;
use mockall::mock;

mock! {
    pub Sink {}
    impl CommandSink for Sink {
        fn record(&mut self, cycle: u64, command: &DramCommand) -> Result<(), TraceError>;
        fn flush(&mut self) -> Result<(), TraceError>;
    }
}
