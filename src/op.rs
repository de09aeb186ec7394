use crate::{error::EvalError, matrix, value::Value};

/// Operator identities. Unary plus and minus are distinct from their binary
/// namesakes because they take a different number of operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
    Pos,
    Neg,
}

pub struct OpDescriptor {
    pub op: Operator,
    pub symbol: char,
    /// Higher binds tighter.
    pub precedence: u8,
    pub arity: usize,
    pub apply: fn(&[Value]) -> Result<Value, EvalError>,
}

/// Indexed by `Operator as usize`.
pub static OPERATORS: [OpDescriptor; 8] = [
    OpDescriptor {
        op: Operator::Add,
        symbol: '+',
        precedence: 1,
        arity: 2,
        apply: add,
    },
    OpDescriptor {
        op: Operator::Sub,
        symbol: '-',
        precedence: 1,
        arity: 2,
        apply: sub,
    },
    OpDescriptor {
        op: Operator::Mul,
        symbol: '*',
        precedence: 2,
        arity: 2,
        apply: mul,
    },
    OpDescriptor {
        op: Operator::Div,
        symbol: '/',
        precedence: 2,
        arity: 2,
        apply: div,
    },
    OpDescriptor {
        op: Operator::Rem,
        symbol: '%',
        precedence: 2,
        arity: 2,
        apply: rem,
    },
    OpDescriptor {
        op: Operator::Pow,
        symbol: '^',
        precedence: 3,
        arity: 2,
        apply: pow,
    },
    OpDescriptor {
        op: Operator::Pos,
        symbol: '+',
        precedence: 3,
        arity: 1,
        apply: pos,
    },
    OpDescriptor {
        op: Operator::Neg,
        symbol: '-',
        precedence: 3,
        arity: 1,
        apply: neg,
    },
];

/// Function application binds tighter than every arithmetic operator.
pub const CALL_PRECEDENCE: u8 = 4;

impl Operator {
    pub fn descriptor(self) -> &'static OpDescriptor {
        &OPERATORS[self as usize]
    }

    pub fn symbol(self) -> char {
        self.descriptor().symbol
    }

    pub fn precedence(self) -> u8 {
        self.descriptor().precedence
    }

    pub fn arity(self) -> usize {
        self.descriptor().arity
    }

    pub fn is_prefix(self) -> bool {
        self.arity() == 1
    }

    /// The binary operator spelled `c`, if any.
    pub fn binary(c: char) -> Option<Operator> {
        OPERATORS
            .iter()
            .find(|desc| desc.arity == 2 && desc.symbol == c)
            .map(|desc| desc.op)
    }

    /// The prefix form of `+` and `-`; every other operator has none.
    pub fn unary(self) -> Option<Operator> {
        match self {
            Operator::Add => Some(Operator::Pos),
            Operator::Sub => Some(Operator::Neg),
            _ => None,
        }
    }

    /// Applies the operator to operands given in source order.
    pub fn apply(self, operands: &[Value]) -> Result<Value, EvalError> {
        let desc = self.descriptor();
        if operands.len() != desc.arity {
            return Err(EvalError::malformed(format!(
                "'{}' takes {} operand(s), got {}",
                desc.symbol,
                desc.arity,
                operands.len()
            )));
        }
        match (desc.apply)(operands)? {
            Value::Number(n) if !n.is_finite() => Err(EvalError::malformed(format!(
                "'{}' gives {n}, which is not a finite number",
                desc.symbol
            ))),
            value => Ok(value),
        }
    }
}

fn numbers(symbol: char, operands: &[Value]) -> Result<(f64, f64), EvalError> {
    match operands {
        [Value::Number(lhs), Value::Number(rhs)] => Ok((*lhs, *rhs)),
        [lhs, rhs] => Err(EvalError::malformed(format!(
            "'{symbol}' is not defined between a {} and a {}",
            lhs.kind(),
            rhs.kind()
        ))),
        _ => Err(EvalError::malformed(format!("'{symbol}' takes 2 operands"))),
    }
}

fn number(symbol: char, operands: &[Value]) -> Result<f64, EvalError> {
    match operands {
        [Value::Number(n)] => Ok(*n),
        [value] => Err(EvalError::malformed(format!(
            "unary '{symbol}' is not defined for a {}",
            value.kind()
        ))),
        _ => Err(EvalError::malformed(format!("unary '{symbol}' takes 1 operand"))),
    }
}

fn add(operands: &[Value]) -> Result<Value, EvalError> {
    match operands {
        [Value::Matrix(lhs), Value::Matrix(rhs)] => matrix::add(lhs, rhs).map(Value::Matrix),
        _ => numbers('+', operands).map(|(lhs, rhs)| Value::Number(lhs + rhs)),
    }
}

fn sub(operands: &[Value]) -> Result<Value, EvalError> {
    numbers('-', operands).map(|(lhs, rhs)| Value::Number(lhs - rhs))
}

fn mul(operands: &[Value]) -> Result<Value, EvalError> {
    numbers('*', operands).map(|(lhs, rhs)| Value::Number(lhs * rhs))
}

fn div(operands: &[Value]) -> Result<Value, EvalError> {
    let (lhs, rhs) = numbers('/', operands)?;
    if rhs == 0.0 {
        return Err(EvalError::DivisionByZero { span: None });
    }
    Ok(Value::Number(lhs / rhs))
}

fn rem(operands: &[Value]) -> Result<Value, EvalError> {
    let (lhs, rhs) = numbers('%', operands)?;
    if rhs == 0.0 {
        return Err(EvalError::DivisionByZero { span: None });
    }
    Ok(Value::Number(lhs % rhs))
}

fn pow(operands: &[Value]) -> Result<Value, EvalError> {
    numbers('^', operands).map(|(lhs, rhs)| Value::Number(lhs.powf(rhs)))
}

fn pos(operands: &[Value]) -> Result<Value, EvalError> {
    number('+', operands).map(Value::Number)
}

fn neg(operands: &[Value]) -> Result<Value, EvalError> {
    number('-', operands).map(|n| Value::Number(-n))
}
