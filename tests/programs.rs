use std::io::Write;
use synacor_vm::{
    load_image, BufferConsole, Console, Machine, Outcome, ProgramMemory, Register, StepStatus,
    VmError,
};
use tempfile::NamedTempFile;

const R0: u16 = 32768;
const R1: u16 = 32769;

fn image_bytes(words: &[u16]) -> Vec<u8> {
    words.iter().flat_map(|word| word.to_le_bytes()).collect()
}

fn run(words: &[u16], input: &[u8]) -> (Machine, Result<Outcome, VmError>, BufferConsole) {
    let mut machine = Machine::from_words(words).expect("image fits");
    let mut console = BufferConsole::new(input);
    let result = machine.run(&mut console, Some(100_000));
    (machine, result, console)
}

fn reg(index: u8) -> Register {
    Register::new(index).unwrap()
}

#[test]
fn add_then_out_prints_sum_and_halts() {
    // set r1 65; add r0 r1 4; out r0; halt
    let (machine, result, console) = run(&[1, R1, 65, 9, R0, R1, 4, 19, R0, 0], b"");
    assert_eq!(result.unwrap(), Outcome::Halted);
    assert_eq!(console.output_string(), "E");
    assert_eq!(machine.state().steps(), 4);
}

#[test]
fn add_two_to_65_prints_c() {
    let (_, result, console) = run(&[1, R1, 65, 9, R0, R1, 2, 19, R0, 0], b"");
    assert_eq!(result.unwrap(), Outcome::Halted);
    assert_eq!(console.output_string(), "C");
}

#[test]
fn image_file_runs_end_to_end() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(&image_bytes(&[19, 104, 19, 105, 19, 10, 0]))
        .unwrap();
    let memory = load_image(file.path()).unwrap();
    let mut machine = Machine::new(memory);
    let mut console = BufferConsole::default();
    assert_eq!(machine.run(&mut console, None).unwrap(), Outcome::Halted);
    assert_eq!(console.output_string(), "hi\n");
}

#[test]
fn echo_loop_copies_a_line_of_input() {
    // 0: in r0
    // 2: out r0
    // 4: eq r1 r0 10
    // 8: jf r1 0
    // 11: halt
    let program = [20, R0, 19, R0, 4, R1, R0, 10, 8, R1, 0, 0];
    let (_, result, console) = run(&program, b"look\nrest");
    assert_eq!(result.unwrap(), Outcome::Halted);
    assert_eq!(console.output_string(), "look\n");
    assert_eq!(console.remaining_input(), 4);
}

#[test]
fn push_push_pop_is_lifo() {
    let (machine, result, _) = run(&[2, 11, 2, 22, 3, R0, 0], b"");
    result.unwrap();
    assert_eq!(machine.state().get_reg(reg(0)), 22);
    assert_eq!(machine.state().stack(), &[11]);
}

#[test]
fn subroutine_counts_down_with_call_and_ret() {
    // r0 = 3; loop: call print; add r0 r0 32767 (r0 - 1); jt r0 loop; halt
    // print: add r1 r0 48; out r1; ret
    let program = [
        1, R0, 3, // 0
        17, 15, // 3: call 15
        9, R0, R0, 32767, // 5: r0 -= 1
        7, R0, 3, // 9: jt r0 3
        0, 0, 0, // 12: halt + padding
        9, R1, R0, 48, // 15
        19, R1, // 19
        18, // 21
    ];
    let (machine, result, console) = run(&program, b"");
    assert_eq!(result.unwrap(), Outcome::Halted);
    assert_eq!(console.output_string(), "321");
    assert!(machine.state().stack().is_empty());
}

#[test]
fn self_modifying_write_changes_next_instruction() {
    // wmem 5 19 turns the noop at 5 into `out 33`
    let (_, result, console) = run(&[16, 5, 19, 21, 21, 21, 33, 0], b"");
    assert_eq!(result.unwrap(), Outcome::Halted);
    assert_eq!(console.output_string(), "!");
}

#[test]
fn invalid_opcode_keeps_earlier_effects() {
    let (machine, result, console) = run(&[1, R0, 9, 19, 88, 22, 1, R0, 1, 0], b"");
    match result {
        Err(VmError::InvalidOpcode { opcode, address }) => {
            assert_eq!(opcode, 22);
            assert_eq!(address, 5);
        }
        other => panic!("expected invalid opcode, got {other:?}"),
    }
    assert_eq!(machine.state().get_reg(reg(0)), 9);
    assert_eq!(console.output_string(), "X");
    assert_eq!(machine.state().ip(), 5);
    assert_eq!(machine.state().steps(), 2);
}

#[test]
fn invalid_operand_is_an_error_not_a_memory_access() {
    let (machine, result, _) = run(&[1, 32776, 7, 0], b"");
    assert!(matches!(
        result,
        Err(VmError::InvalidOperand {
            word: 32776,
            address: 0
        })
    ));
    assert!(machine.state().registers().iter().all(|value| *value == 0));
    assert_eq!(machine.memory().load(32776 - 32768), Some(0));
}

#[test]
fn pop_underflow_leaves_registers_alone() {
    let (machine, result, _) = run(&[1, R1, 5, 3, R0, 0], b"");
    let err = result.unwrap_err();
    assert!(matches!(err, VmError::StackUnderflow { address: 3 }));
    assert_eq!(err.exit_code(), 3);
    assert_eq!(machine.state().get_reg(reg(0)), 0);
    assert_eq!(machine.state().get_reg(reg(1)), 5);
}

#[test]
fn stepping_reports_running_until_stop() {
    let mut machine = Machine::from_words(&[21, 21, 0]).unwrap();
    let mut console = BufferConsole::default();
    assert_eq!(machine.step(&mut console).unwrap(), StepStatus::Running);
    assert_eq!(machine.step(&mut console).unwrap(), StepStatus::Running);
    assert_eq!(
        machine.step(&mut console).unwrap(),
        StepStatus::Stopped(Outcome::Halted)
    );
    console.flush().unwrap();
}

#[test]
fn running_off_a_zeroed_tail_halts() {
    // memory past the image is zero, and zero is `halt`
    let memory = ProgramMemory::from_words(&[21]).unwrap();
    let mut machine = Machine::new(memory);
    let mut console = BufferConsole::default();
    assert_eq!(machine.run(&mut console, None).unwrap(), Outcome::Halted);
    assert_eq!(machine.state().steps(), 2);
}
