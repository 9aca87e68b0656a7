//! A tiny interpreter for the subset of RARS assembly the generator emits.
//!
//! Only what the listings use is understood: `.data`/`.text`, `.word`,
//! `.space`, `.string`, the integer register moves and arithmetic, word
//! loads and stores (offset and label forms), the branch family, `jal`/`ret`
//! and the print/read/exit environment calls.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};

const MEMORY_SIZE: usize = 1 << 20;
const DATA_BASE: u32 = 0x1000;
const STACK_TOP: u32 = 0xF_FFF0;
const STEP_LIMIT: usize = 1_000_000;

/// Outcome of running a listing to its exit call
#[derive(Debug)]
pub struct Run {
    pub stdout: String,
    pub exit_code: i32,
    pub steps: usize,
    regs: [i32; 32],
}

impl Run {
    pub fn reg(&self, name: &str) -> i32 {
        self.regs[reg_index(name).unwrap_or_else(|| panic!("no register {}", name))]
    }
}

#[derive(Debug, Clone)]
enum Operand {
    Reg(usize),
    Imm(i32),
    Mem { offset: i32, base: usize },
    Label(String),
}

#[derive(Debug, Clone)]
struct Instr {
    op: String,
    args: Vec<Operand>,
    line: usize,
}

fn reg_index(name: &str) -> Option<usize> {
    let index = match name {
        "zero" => 0,
        "ra" => 1,
        "sp" => 2,
        "gp" => 3,
        "tp" => 4,
        "t0" => 5,
        "t1" => 6,
        "t2" => 7,
        "fp" | "s0" => 8,
        "s1" => 9,
        _ => {
            let n: usize = name.strip_prefix('a')?.parse().ok()?;
            if n > 7 {
                return None;
            }
            10 + n
        }
    };
    Some(index)
}

fn parse_operand(text: &str) -> Operand {
    let text = text.trim();
    if let Some(reg) = reg_index(text) {
        return Operand::Reg(reg);
    }
    if let Ok(value) = text.parse::<i32>() {
        return Operand::Imm(value);
    }
    if let (Some(open), true) = (text.find('('), text.ends_with(')')) {
        let offset = text[..open].trim().parse().unwrap_or(0);
        if let Some(base) = reg_index(&text[open + 1..text.len() - 1]) {
            return Operand::Mem { offset, base };
        }
    }
    Operand::Label(text.to_string())
}

/// Strip a trailing comment that is not inside a string literal
fn strip_comment(line: &str) -> &str {
    let mut quoted = false;
    let mut escaped = false;
    for (i, c) in line.char_indices() {
        if c == '"' && !escaped {
            quoted = !quoted;
        } else if c == '#' && !quoted {
            return &line[..i];
        }
        escaped = c == '\\' && !escaped;
    }
    line
}

fn unescape(literal: &str) -> Result<Vec<u8>, String> {
    let inner = literal
        .trim()
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .ok_or_else(|| format!("bad string literal {}", literal))?;
    let mut bytes = Vec::new();
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        let c = if c == '\\' {
            match chars.next() {
                Some('n') => '\n',
                Some('t') => '\t',
                Some('0') => '\0',
                Some(other) => other,
                None => return Err("dangling escape".to_string()),
            }
        } else {
            c
        };
        let mut buf = [0u8; 4];
        bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
    }
    bytes.push(0);
    Ok(bytes)
}

enum WordInit {
    Value(i32),
    Label(String),
}

struct Machine {
    memory: Vec<u8>,
    regs: [i32; 32],
    symbols: HashMap<String, u32>,
    code: Vec<Instr>,
    code_labels: HashMap<String, usize>,
    input: VecDeque<i32>,
    stdout: String,
}

impl Machine {
    fn load(asm: &str) -> Result<Self, String> {
        let mut machine = Machine {
            memory: vec![0; MEMORY_SIZE],
            regs: [0; 32],
            symbols: HashMap::new(),
            code: Vec::new(),
            code_labels: HashMap::new(),
            input: VecDeque::new(),
            stdout: String::new(),
        };

        let mut in_text = false;
        let mut data_ptr = DATA_BASE;
        let mut words: Vec<(u32, WordInit)> = Vec::new();

        for (number, raw) in asm.lines().enumerate() {
            let mut line = strip_comment(raw).trim();
            if line.is_empty() {
                continue;
            }
            match line {
                ".data" => {
                    in_text = false;
                    continue;
                }
                ".text" => {
                    in_text = true;
                    continue;
                }
                _ => {}
            }

            if let Some(colon) = line.find(':') {
                let label = &line[..colon];
                if !label.contains(char::is_whitespace) && !label.contains('"') {
                    if in_text {
                        machine.code_labels.insert(label.to_string(), machine.code.len());
                    } else {
                        machine.symbols.insert(label.to_string(), data_ptr);
                    }
                    line = line[colon + 1..].trim();
                    if line.is_empty() {
                        continue;
                    }
                }
            }

            if !in_text {
                let (directive, rest) = line
                    .split_once(char::is_whitespace)
                    .ok_or_else(|| format!("line {}: bad data directive", number + 1))?;
                match directive {
                    ".word" => {
                        let init = match rest.trim().parse::<i32>() {
                            Ok(value) => WordInit::Value(value),
                            Err(_) => WordInit::Label(rest.trim().to_string()),
                        };
                        words.push((data_ptr, init));
                        data_ptr += 4;
                    }
                    ".space" => {
                        let size: u32 = rest
                            .trim()
                            .parse()
                            .map_err(|_| format!("line {}: bad .space", number + 1))?;
                        data_ptr += size;
                    }
                    ".string" => {
                        let bytes = unescape(rest)?;
                        let start = data_ptr as usize;
                        machine.memory[start..start + bytes.len()].copy_from_slice(&bytes);
                        data_ptr += bytes.len() as u32;
                        data_ptr = (data_ptr + 3) & !3;
                    }
                    other => return Err(format!("line {}: unknown directive {}", number + 1, other)),
                }
                continue;
            }

            let (op, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
            let args = if rest.trim().is_empty() {
                Vec::new()
            } else {
                rest.split(',').map(parse_operand).collect()
            };
            machine.code.push(Instr {
                op: op.to_string(),
                args,
                line: number + 1,
            });
        }

        for (addr, init) in words {
            let value = match init {
                WordInit::Value(value) => value,
                WordInit::Label(label) => *machine
                    .symbols
                    .get(&label)
                    .ok_or_else(|| format!("undefined data label {}", label))?
                    as i32,
            };
            machine.store(addr, value)?;
        }
        Ok(machine)
    }

    fn check(&self, addr: u32) -> Result<usize, String> {
        let addr = addr as usize;
        if addr + 4 > MEMORY_SIZE {
            return Err(format!("address {:#x} out of range", addr));
        }
        Ok(addr)
    }

    fn store(&mut self, addr: u32, value: i32) -> Result<(), String> {
        let addr = self.check(addr)?;
        self.memory[addr..addr + 4].copy_from_slice(&value.to_le_bytes());
        Ok(())
    }

    fn fetch(&self, addr: u32) -> Result<i32, String> {
        let addr = self.check(addr)?;
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(&self.memory[addr..addr + 4]);
        Ok(i32::from_le_bytes(bytes))
    }

    fn c_string(&self, addr: u32) -> Result<String, String> {
        let start = self.check(addr)?;
        let end = self.memory[start..]
            .iter()
            .position(|&b| b == 0)
            .map(|n| start + n)
            .ok_or("unterminated string")?;
        Ok(String::from_utf8_lossy(&self.memory[start..end]).into_owned())
    }

    fn set(&mut self, reg: usize, value: i32) {
        if reg != 0 {
            self.regs[reg] = value;
        }
    }

    fn symbol(&self, label: &str) -> Result<u32, String> {
        self.symbols
            .get(label)
            .copied()
            .ok_or_else(|| format!("undefined symbol {}", label))
    }

    fn target(&self, label: &str) -> Result<usize, String> {
        self.code_labels
            .get(label)
            .copied()
            .ok_or_else(|| format!("undefined code label {}", label))
    }

    fn run(mut self, input: &[i32]) -> Result<Run, String> {
        self.input = input.iter().copied().collect();
        self.regs[2] = STACK_TOP as i32;
        let mut pc = self.target("program")?;

        for steps in 0..STEP_LIMIT {
            let instr = self
                .code
                .get(pc)
                .cloned()
                .ok_or_else(|| format!("fell off the end of the program at {}", pc))?;
            let err = |msg: &str| format!("line {}: {} {}", instr.line, instr.op, msg);
            let mut next = pc + 1;

            use Operand::*;
            match (instr.op.as_str(), instr.args.as_slice()) {
                ("li", [Reg(rd), Imm(v)]) => self.set(*rd, *v),
                ("mv", [Reg(rd), Reg(rs)]) => self.set(*rd, self.regs[*rs]),
                ("add", [Reg(rd), Reg(a), Reg(b)]) => {
                    self.set(*rd, self.regs[*a].wrapping_add(self.regs[*b]))
                }
                ("sub", [Reg(rd), Reg(a), Reg(b)]) => {
                    self.set(*rd, self.regs[*a].wrapping_sub(self.regs[*b]))
                }
                ("addi", [Reg(rd), Reg(rs), Imm(v)]) => {
                    self.set(*rd, self.regs[*rs].wrapping_add(*v))
                }
                ("slli", [Reg(rd), Reg(rs), Imm(v)]) => {
                    self.set(*rd, self.regs[*rs].wrapping_shl(*v as u32))
                }
                ("la", [Reg(rd), Label(l)]) => {
                    let addr = self.symbol(l)?;
                    self.set(*rd, addr as i32)
                }
                ("lw", [Reg(rd), Mem { offset, base }]) => {
                    let addr = self.regs[*base].wrapping_add(*offset) as u32;
                    let value = self.fetch(addr)?;
                    self.set(*rd, value)
                }
                ("lw", [Reg(rd), Label(l)]) => {
                    let value = self.fetch(self.symbol(l)?)?;
                    self.set(*rd, value)
                }
                ("sw", [Reg(rs), Mem { offset, base }]) => {
                    let addr = self.regs[*base].wrapping_add(*offset) as u32;
                    self.store(addr, self.regs[*rs])?
                }
                ("sw", [Reg(rs), Label(l), Reg(tmp)]) => {
                    let addr = self.symbol(l)?;
                    self.set(*tmp, addr as i32);
                    self.store(addr, self.regs[*rs])?
                }
                ("b", [Label(l)]) => next = self.target(l)?,
                ("beq" | "bne" | "blt" | "bgt", [Reg(a), Reg(b), Label(l)]) => {
                    let (x, y) = (self.regs[*a], self.regs[*b]);
                    let taken = match instr.op.as_str() {
                        "beq" => x == y,
                        "bne" => x != y,
                        "blt" => x < y,
                        _ => x > y,
                    };
                    if taken {
                        next = self.target(l)?;
                    }
                }
                ("bnez", [Reg(rs), Label(l)]) => {
                    if self.regs[*rs] != 0 {
                        next = self.target(l)?;
                    }
                }
                ("jal", [Label(l)]) => {
                    self.set(1, next as i32);
                    next = self.target(l)?;
                }
                ("ret", []) => next = self.regs[1] as usize,
                ("ecall", []) => match self.regs[17] {
                    1 => self.stdout.push_str(&self.regs[10].to_string()),
                    4 => {
                        let text = self.c_string(self.regs[10] as u32)?;
                        self.stdout.push_str(&text);
                    }
                    5 => {
                        let value = self.input.pop_front().ok_or_else(|| err("input exhausted"))?;
                        self.set(10, value);
                    }
                    10 => {
                        return Ok(self.finish(0, steps + 1));
                    }
                    93 => {
                        let code = self.regs[10];
                        return Ok(self.finish(code, steps + 1));
                    }
                    other => return Err(err(&format!("unsupported syscall {}", other))),
                },
                _ => return Err(err("unsupported operand shape")),
            }
            pc = next;
        }
        Err(format!("no exit after {} steps", STEP_LIMIT))
    }

    fn finish(self, exit_code: i32, steps: usize) -> Run {
        Run {
            stdout: self.stdout,
            exit_code,
            steps,
            regs: self.regs,
        }
    }
}

/// Assemble `asm` and run it from `program:` until it exits
pub fn run(asm: &str, input: &[i32]) -> Result<Run, String> {
    Machine::load(asm)?.run(input)
}
