//! List codec: typed/untyped, fixed/variable length forms.
//!
//! ```text
//! list ::= x55 type value* 'Z'   # variable-length typed
//!      ::= 'V' type int value*   # fixed-length typed
//!      ::= x57 value* 'Z'        # variable-length untyped
//!      ::= x58 int value*        # fixed-length untyped
//!      ::= [x70-x77] type value* # fixed typed, length 0-7
//!      ::= [x78-x7f] value*      # fixed untyped, length 0-7
//! ```
//!
//! The list is appended to the reference table before its children are
//! decoded, so a child holding `'Q'` back to the list resolves to the list
//! itself and cycles materialize without recursion.

use crate::constants::*;
use crate::decoder::Decoder;
use crate::encoder::Encoder;
use crate::error::{HessianError, Result};
use crate::value::{List, Value};

impl Decoder<'_> {
    /// Reads a list-typed field, accepting a back-reference or null.
    pub fn read_list(&mut self) -> Result<List> {
        match self.read_value()? {
            Value::List(list) => Ok(list),
            Value::Null => Ok(List::new()),
            other => Err(HessianError::TypeMismatch(format!(
                "expected list, found {}",
                other.kind()
            ))),
        }
    }

    pub(crate) fn read_list_tag(&mut self, tag: u8) -> Result<Value> {
        match tag {
            0x70..=0x77 => {
                let type_name = self.read_type()?;
                let len = usize::from(tag - BC_LIST_DIRECT);
                self.read_fixed_list(Some(type_name), len)
            }
            0x78..=0x7f => {
                let len = usize::from(tag - BC_LIST_DIRECT_UNTYPED);
                self.read_fixed_list(None, len)
            }
            BC_LIST_FIXED => {
                let type_name = self.read_type()?;
                let len = self.read_length()?;
                self.read_fixed_list(Some(type_name), len)
            }
            BC_LIST_FIXED_UNTYPED => {
                let len = self.read_length()?;
                self.read_fixed_list(None, len)
            }
            BC_LIST_VARIABLE => {
                let type_name = self.read_type()?;
                self.read_variable_list(Some(type_name))
            }
            BC_LIST_VARIABLE_UNTYPED => self.read_variable_list(None),
            _ => Err(HessianError::InvalidTag(tag)),
        }
    }

    fn read_length(&mut self) -> Result<usize> {
        let len = self.read_i32()?;
        if len < 0 {
            return Err(HessianError::TypeMismatch(format!(
                "negative list length {len}"
            )));
        }
        Ok(len as usize)
    }

    fn read_fixed_list(&mut self, type_name: Option<String>, len: usize) -> Result<Value> {
        let list = match type_name {
            Some(t) => List::typed(t),
            None => List::new(),
        };
        self.refs.push(Value::List(list.clone()));
        for _ in 0..len {
            let item = self.read_value()?;
            list.push(item);
        }
        Ok(Value::List(list))
    }

    fn read_variable_list(&mut self, type_name: Option<String>) -> Result<Value> {
        let list = match type_name {
            Some(t) => List::typed(t),
            None => List::new(),
        };
        self.refs.push(Value::List(list.clone()));
        loop {
            match self.reader.peek_byte() {
                Some(BC_END) => {
                    self.reader.read_byte()?;
                    return Ok(Value::List(list));
                }
                Some(_) => {
                    let item = self.read_value()?;
                    list.push(item);
                }
                None => return Err(HessianError::ShortRead { need: 1, have: 0 }),
            }
        }
    }
}

impl Encoder {
    /// Writes a list; typed lists carry their type descriptor inline.
    pub fn write_list(&mut self, list: &List) -> Result<()> {
        if self.check_ref(list.ptr_id())? {
            return Ok(());
        }
        let type_name = list.type_name();
        let items = list.items();
        let len = items.len();
        match &type_name {
            Some(t) => {
                if len <= usize::from(LIST_DIRECT_MAX) {
                    self.writer.put_u8(BC_LIST_DIRECT + len as u8);
                    self.write_type(t)?;
                } else {
                    self.writer.put_u8(BC_LIST_FIXED);
                    self.write_type(t)?;
                    self.write_i32(len as i32)?;
                }
            }
            None => {
                if len <= usize::from(LIST_DIRECT_MAX) {
                    self.writer.put_u8(BC_LIST_DIRECT_UNTYPED + len as u8);
                } else {
                    self.writer.put_u8(BC_LIST_FIXED_UNTYPED);
                    self.write_i32(len as i32)?;
                }
            }
        }
        for item in items.iter() {
            self.encode(item)?;
        }
        Ok(())
    }
}
