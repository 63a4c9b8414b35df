mod gate;

pub use gate::{Gate, GateMiddlewareFactory, GateMiddlewareService, Guard, Rejection, Verdict, TOKEN_HEADER};
