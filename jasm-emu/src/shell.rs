//! The interactive debug shell (C9): step, continue, breakpoints,
//! register/memory inspection. Every command is a one-line effect over a
//! [`Cpu`], matching spec §4.9.

use std::collections::BTreeSet;
use std::io::{self, BufRead, Write};

use jasm_isa::{split_header, Cpu, OpCode};

pub struct Shell<R, W> {
    cpu: Cpu,
    breakpoints: BTreeSet<u16>,
    input: R,
    output: W,
}

/// Outcome of one `step`/`cont`/`run`, surfaced to the shell as an
/// informational string rather than an error (spec §7, "State signals").
enum StepOutcome {
    Ran,
    Halted,
    Breakpoint(u16),
    Error(String),
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            cpu: Cpu::new(),
            breakpoints: BTreeSet::new(),
            input,
            output,
        }
    }

    pub fn load_initial(&mut self, data: &[u8]) -> anyhow::Result<()> {
        self.cpu.load_program(data, 0)?;
        Ok(())
    }

    /// Runs the command loop until `quit` or EOF. Never returns an `Err`
    /// from a bad command — those are printed and the shell keeps going,
    /// per spec §7 ("the REPL catches and prints the error and remains
    /// usable").
    pub fn run(&mut self) -> anyhow::Result<()> {
        loop {
            write!(self.output, "jasm> ")?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                break;
            }
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if !self.dispatch(line)? {
                break;
            }
        }
        Ok(())
    }

    /// Returns `Ok(false)` when the shell should exit (i.e. `quit`).
    fn dispatch(&mut self, line: &str) -> anyhow::Result<bool> {
        let mut parts = line.split_whitespace();
        let cmd = parts.next().unwrap_or("");
        let args: Vec<&str> = parts.collect();

        match cmd {
            "load" => self.cmd_load(&args)?,
            "step" => self.cmd_step()?,
            "cont" | "run" => self.cmd_run()?,
            "break" => self.cmd_break(&args)?,
            "regs" => self.cmd_regs()?,
            "mem" => self.cmd_mem(&args)?,
            "disasm" => self.cmd_disasm(&args)?,
            "ports" => self.cmd_ports()?,
            "help" => self.cmd_help()?,
            "quit" => return Ok(false),
            other => writeln!(self.output, "unknown command '{}' (try 'help')", other)?,
        }
        Ok(true)
    }

    fn cmd_load(&mut self, args: &[&str]) -> anyhow::Result<()> {
        let Some(path) = args.first() else {
            writeln!(self.output, "usage: load <path>")?;
            return Ok(());
        };
        match std::fs::read(path) {
            Ok(data) => {
                self.cpu.load_program(&data, 0)?;
                writeln!(self.output, "loaded {} bytes from {}", data.len(), path)?;
            }
            Err(err) => writeln!(self.output, "error: {}", err)?,
        }
        Ok(())
    }

    fn step_once(&mut self) -> StepOutcome {
        if self.cpu.is_halted() {
            return StepOutcome::Halted;
        }
        if self.breakpoints.contains(&self.cpu.pc) {
            return StepOutcome::Breakpoint(self.cpu.pc);
        }
        match self.cpu.step() {
            Ok(()) => StepOutcome::Ran,
            Err(err) => StepOutcome::Error(err.to_string()),
        }
    }

    fn cmd_step(&mut self) -> anyhow::Result<()> {
        match self.step_once() {
            StepOutcome::Ran => writeln!(self.output, "ok")?,
            StepOutcome::Halted => writeln!(self.output, "halted")?,
            StepOutcome::Breakpoint(pc) => writeln!(self.output, "breakpoint at 0x{:04X}", pc)?,
            StepOutcome::Error(msg) => writeln!(self.output, "error: {}", msg)?,
        }
        Ok(())
    }

    fn cmd_run(&mut self) -> anyhow::Result<()> {
        loop {
            match self.step_once() {
                StepOutcome::Ran => continue,
                StepOutcome::Halted => {
                    writeln!(self.output, "halted")?;
                    return Ok(());
                }
                StepOutcome::Breakpoint(pc) => {
                    writeln!(self.output, "breakpoint at 0x{:04X}", pc)?;
                    return Ok(());
                }
                StepOutcome::Error(msg) => {
                    writeln!(self.output, "error: {}", msg)?;
                    return Ok(());
                }
            }
        }
    }

    fn cmd_break(&mut self, args: &[&str]) -> anyhow::Result<()> {
        let Some(addr) = args.first().and_then(|a| parse_hex(a)) else {
            writeln!(self.output, "usage: break <hex>")?;
            return Ok(());
        };
        self.breakpoints.insert(addr);
        writeln!(self.output, "breakpoint set at 0x{:04X}", addr)?;
        Ok(())
    }

    fn cmd_regs(&mut self) -> anyhow::Result<()> {
        use jasm_isa::RegisterId::*;
        writeln!(
            self.output,
            "PC=0x{:04X} SP=0x{:04X} F=0x{:02X} STS=0x{:02X}",
            self.cpu.pc, self.cpu.sp, self.cpu.flags.0, self.cpu.sts
        )?;
        writeln!(
            self.output,
            "A=0x{:02X} B=0x{:02X} C=0x{:02X} D=0x{:02X} X=0x{:02X} Y=0x{:02X}",
            self.cpu.regs.get(A),
            self.cpu.regs.get(B),
            self.cpu.regs.get(C),
            self.cpu.regs.get(D),
            self.cpu.regs.get(X),
            self.cpu.regs.get(Y),
        )?;
        Ok(())
    }

    fn cmd_mem(&mut self, args: &[&str]) -> anyhow::Result<()> {
        let (Some(addr), Some(len)) = (
            args.first().and_then(|a| parse_hex(a)),
            args.get(1).and_then(|a| a.parse::<u32>().ok()),
        ) else {
            writeln!(self.output, "usage: mem <hex> <len>")?;
            return Ok(());
        };
        let mut a = addr;
        let mut remaining = len;
        while remaining > 0 {
            let row_len = remaining.min(16);
            write!(self.output, "0x{:04X}:", a)?;
            for i in 0..row_len {
                write!(self.output, " {:02X}", self.cpu.mem.read_u8(a.wrapping_add(i as u16)))?;
            }
            writeln!(self.output)?;
            a = a.wrapping_add(row_len as u16);
            remaining -= row_len;
        }
        Ok(())
    }

    fn cmd_disasm(&mut self, args: &[&str]) -> anyhow::Result<()> {
        let addr = args
            .first()
            .and_then(|a| parse_hex(a))
            .unwrap_or(self.cpu.pc);
        let header = self.cpu.mem.read_u8(addr);
        let (raw_op, mode) = split_header(header);
        match OpCode::from_u8(raw_op) {
            Some(op) => writeln!(self.output, "0x{:04X}: {} mode={}", addr, op, mode)?,
            None => writeln!(self.output, "0x{:04X}: <unknown opcode {}> mode={}", addr, raw_op, mode)?,
        }
        Ok(())
    }

    fn cmd_ports(&mut self) -> anyhow::Result<()> {
        for (port, value) in self.cpu.mem.nonzero_ports() {
            writeln!(self.output, "port 0x{:02X} = 0x{:02X}", port, value)?;
        }
        Ok(())
    }

    fn cmd_help(&mut self) -> anyhow::Result<()> {
        writeln!(
            self.output,
            "commands: load <path> | step | cont | run | break <hex> | regs | mem <hex> <len> | disasm [hex] | ports | help | quit"
        )?;
        Ok(())
    }
}

fn parse_hex(s: &str) -> Option<u16> {
    let s = s.strip_prefix("0x").unwrap_or(s);
    u16::from_str_radix(s, 16).ok()
}

pub fn stdio_shell() -> Shell<io::BufReader<io::Stdin>, io::Stdout> {
    Shell::new(io::BufReader::new(io::stdin()), io::stdout())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn shell_with(program: &[u8], script: &str) -> Shell<Cursor<Vec<u8>>, Vec<u8>> {
        let mut shell = Shell::new(Cursor::new(script.as_bytes().to_vec()), Vec::new());
        shell.load_initial(program).unwrap();
        shell
    }

    #[test]
    fn step_past_halt_reports_halted() {
        let program = [jasm_isa::header_byte(OpCode::Halt as u8, 0)];
        let mut shell = shell_with(&program, "step\nstep\nquit\n");
        shell.run().unwrap();
        let out = String::from_utf8(shell.output).unwrap();
        assert!(out.contains("ok"));
        assert!(out.contains("halted"));
    }

    #[test]
    fn breakpoint_halts_run_before_executing() {
        let program = [
            jasm_isa::header_byte(OpCode::Nop as u8, 0),
            jasm_isa::header_byte(OpCode::Halt as u8, 0),
        ];
        let mut shell = shell_with(&program, "break 1\nrun\nquit\n");
        shell.run().unwrap();
        let out = String::from_utf8(shell.output).unwrap();
        assert!(out.contains("breakpoint at 0x0001"));
    }

    #[test]
    fn unknown_command_does_not_abort_the_shell() {
        let program = [jasm_isa::header_byte(OpCode::Nop as u8, 0)];
        let mut shell = shell_with(&program, "bogus\nstep\nquit\n");
        shell.run().unwrap();
        let out = String::from_utf8(shell.output).unwrap();
        assert!(out.contains("unknown command"));
        assert!(out.contains("ok"));
    }
}
