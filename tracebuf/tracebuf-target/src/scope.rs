/// A guard that runs a function when dropped. Used by [`trace_scoped!`](crate::trace_scoped) to
/// catch scope exits via return and other control flow statements.
pub struct DropGuard<F: FnOnce()> {
    drop_fn: Option<F>,
}

impl<F: FnOnce()> DropGuard<F> {
    pub fn new(drop_fn: F) -> Self {
        Self {
            drop_fn: Some(drop_fn),
        }
    }
}

impl<F: FnOnce()> Drop for DropGuard<F> {
    fn drop(&mut self) {
        if let Some(f) = self.drop_fn.take() {
            f();
        }
    }
}

#[macro_export]
/// Records `$enter` before the block and `$exit` after it, then passes the block's value through.
///
/// `$exit` is recorded from a drop guard, so it is also traced when the block is left early via
/// `return`, `break`, `continue` or `?`. Without a buffer argument the global
/// [`TRACE`](crate::TRACE) buffer is used.
///
/// # Examples
///
/// ```rust,ignore
/// const LOOP_START: u32 = 99;
///
/// loop {
///     trace(LOOP_START);
///     let reading = trace_scoped!(1, 2, {
///         sensor.read()
///     });
/// }
///
/// // explicit buffer
/// trace_scoped!(in &MY_BUFFER; 10, 11, { handle_packet() });
/// ```
macro_rules! trace_scoped {
    (in $buffer:expr; $enter:expr, $exit:expr, $body:block) => {{
        let buffer = $buffer;
        let exit: u32 = $exit;

        // Create guard before the enter sample to keep it out of the measured scope
        let _guard = $crate::scope::DropGuard::new(move || buffer.record(exit));
        buffer.record($enter);

        $body
    }};
    ($enter:expr, $exit:expr, $body:block) => {
        $crate::trace_scoped!(in &$crate::TRACE; $enter, $exit, $body)
    };
}
