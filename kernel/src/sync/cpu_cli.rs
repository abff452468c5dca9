/// Run `f` with maskable interrupts disabled, then put the Interrupt Flag back the
/// way it was. Nested calls keep interrupts off until the outermost one returns.
#[cfg(target_arch = "x86")]
pub fn without_interrupts<R>(f: impl FnOnce() -> R) -> R {
    use crate::x86::{
        defs::EFLAGS_INTERRUPT_ENABLE,
        helpers::{cli, read_eflags, sti},
    };

    // Clear interrupts as soon as possible
    let eflags = read_eflags();
    cli();

    let result = f();

    if eflags & EFLAGS_INTERRUPT_ENABLE != 0 {
        sti();
    }

    result
}

#[cfg(not(target_arch = "x86"))]
pub fn without_interrupts<R>(f: impl FnOnce() -> R) -> R {
    f()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_is_passed_through() {
        assert_eq!(without_interrupts(|| without_interrupts(|| 7)), 7);
    }
}
