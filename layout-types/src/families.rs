//! Per-runtime-family canonical layouts and version-bucket descriptors.
//!
//! Mirrors `pkg/python/datamap.go` and `pkg/ruby/datamap.go`: one struct
//! per supported version bucket, each implementing [`Describe`] over its
//! own `offsetof`/`sizeof` tags, with a `to_canonical` conversion into a
//! shared per-family layout. Unlike the source, a route's intermediate
//! hops are real dotted paths walked by the resolver in one pass, so
//! fields the source computed by summing two separate offsets (e.g.
//! `PyInterpreterStateTstateHead + PyInterpreterStateIsPythreadsHead`)
//! collapse here into a single nested tag.

use std::fmt;

use crate::descriptor::{Describe, FieldTag};
use crate::envelope::LayoutData;

/// Sentinel written to a destination whose field does not exist in a
/// given version (downstream consumers read this as "not present").
pub const DOES_NOT_EXIST: i64 = -1;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PythonLayout {
    pub ob_type_offset: i64,
    pub string_data_offset: i64,
    pub string_size_offset: i64,
    pub type_name_offset: i64,
    pub thread_state_interp_offset: i64,
    pub thread_state_next_offset: i64,
    pub thread_state_frame_offset: i64,
    pub thread_state_thread_id_offset: i64,
    pub thread_state_native_thread_id_offset: i64,
    pub thread_state_cframe_offset: i64,
    pub cframe_current_frame_offset: i64,
    pub interpreter_state_tstate_head_offset: i64,
    pub runtime_state_interp_main_offset: i64,
    pub frame_back_offset: i64,
    pub frame_code_offset: i64,
    pub frame_lineno_offset: i64,
    pub frame_localsplus_offset: i64,
    pub code_filename_offset: i64,
    pub code_name_offset: i64,
    pub code_varnames_offset: i64,
    pub code_firstlineno_offset: i64,
    pub tuple_item_offset: i64,
}

impl PythonLayout {
    /// Flattens the canonical struct into the field-name-keyed map the
    /// output format writes under `data:`. Keys are this struct's own
    /// field names, which is the Rust-idiomatic analogue of the
    /// source's per-field `yaml:"..."` tags on its nested `PyThreadState`
    /// / `PyFrameObject` / … structs flattened into one level.
    pub fn to_layout_data(&self) -> LayoutData {
        let mut data = LayoutData::new();
        data.insert("ob_type_offset".to_string(), self.ob_type_offset);
        data.insert("string_data_offset".to_string(), self.string_data_offset);
        data.insert("string_size_offset".to_string(), self.string_size_offset);
        data.insert("type_name_offset".to_string(), self.type_name_offset);
        data.insert(
            "thread_state_interp_offset".to_string(),
            self.thread_state_interp_offset,
        );
        data.insert(
            "thread_state_next_offset".to_string(),
            self.thread_state_next_offset,
        );
        data.insert(
            "thread_state_frame_offset".to_string(),
            self.thread_state_frame_offset,
        );
        data.insert(
            "thread_state_thread_id_offset".to_string(),
            self.thread_state_thread_id_offset,
        );
        data.insert(
            "thread_state_native_thread_id_offset".to_string(),
            self.thread_state_native_thread_id_offset,
        );
        data.insert(
            "thread_state_cframe_offset".to_string(),
            self.thread_state_cframe_offset,
        );
        data.insert(
            "cframe_current_frame_offset".to_string(),
            self.cframe_current_frame_offset,
        );
        data.insert(
            "interpreter_state_tstate_head_offset".to_string(),
            self.interpreter_state_tstate_head_offset,
        );
        data.insert(
            "runtime_state_interp_main_offset".to_string(),
            self.runtime_state_interp_main_offset,
        );
        data.insert("frame_back_offset".to_string(), self.frame_back_offset);
        data.insert("frame_code_offset".to_string(), self.frame_code_offset);
        data.insert("frame_lineno_offset".to_string(), self.frame_lineno_offset);
        data.insert(
            "frame_localsplus_offset".to_string(),
            self.frame_localsplus_offset,
        );
        data.insert("code_filename_offset".to_string(), self.code_filename_offset);
        data.insert("code_name_offset".to_string(), self.code_name_offset);
        data.insert(
            "code_varnames_offset".to_string(),
            self.code_varnames_offset,
        );
        data.insert(
            "code_firstlineno_offset".to_string(),
            self.code_firstlineno_offset,
        );
        data.insert("tuple_item_offset".to_string(), self.tuple_item_offset);
        data
    }
}

pub struct Python27 {
    pub ob_type: i64,
    pub string_data: i64,
    pub string_size: i64,
    pub type_name: i64,
    pub ts_interp: i64,
    pub ts_next: i64,
    pub ts_frame: i64,
    pub ts_thread_id: i64,
    pub interp_tstate_head: i64,
    pub frame_back: i64,
    pub frame_code: i64,
    pub frame_lineno: i64,
    pub frame_localsplus: i64,
    pub code_filename: i64,
    pub code_name: i64,
    pub code_varnames: i64,
    pub code_firstlineno: i64,
    pub tuple_item: i64,
}

impl Default for Python27 {
    fn default() -> Self {
        Python27 {
            ob_type: DOES_NOT_EXIST,
            string_data: DOES_NOT_EXIST,
            string_size: DOES_NOT_EXIST,
            type_name: DOES_NOT_EXIST,
            ts_interp: DOES_NOT_EXIST,
            ts_next: DOES_NOT_EXIST,
            ts_frame: DOES_NOT_EXIST,
            ts_thread_id: DOES_NOT_EXIST,
            interp_tstate_head: DOES_NOT_EXIST,
            frame_back: DOES_NOT_EXIST,
            frame_code: DOES_NOT_EXIST,
            frame_lineno: DOES_NOT_EXIST,
            frame_localsplus: DOES_NOT_EXIST,
            code_filename: DOES_NOT_EXIST,
            code_name: DOES_NOT_EXIST,
            code_varnames: DOES_NOT_EXIST,
            code_firstlineno: DOES_NOT_EXIST,
            tuple_item: DOES_NOT_EXIST,
        }
    }
}

impl Describe for Python27 {
    fn describe(&mut self) -> Vec<FieldTag<'_>> {
        vec![
            FieldTag::offset_of("PyObject.ob_type", &mut self.ob_type),
            FieldTag::offset_of("PyStringObject.ob_sval", &mut self.string_data),
            FieldTag::offset_of("PyStringObject.ob_size", &mut self.string_size),
            FieldTag::offset_of("PyTypeObject.tp_name", &mut self.type_name),
            FieldTag::offset_of("PyThreadState.interp", &mut self.ts_interp),
            FieldTag::offset_of("PyThreadState.next", &mut self.ts_next),
            FieldTag::offset_of("PyThreadState.frame", &mut self.ts_frame),
            FieldTag::offset_of("PyThreadState.thread_id", &mut self.ts_thread_id),
            FieldTag::offset_of(
                "PyInterpreterState.tstate_head",
                &mut self.interp_tstate_head,
            ),
            FieldTag::offset_of("PyFrameObject.f_back", &mut self.frame_back),
            FieldTag::offset_of("PyFrameObject.f_code", &mut self.frame_code),
            FieldTag::offset_of("PyFrameObject.f_lineno", &mut self.frame_lineno),
            FieldTag::offset_of("PyFrameObject.f_localsplus", &mut self.frame_localsplus),
            FieldTag::offset_of("PyCodeObject.co_filename", &mut self.code_filename),
            FieldTag::offset_of("PyCodeObject.co_name", &mut self.code_name),
            FieldTag::offset_of("PyCodeObject.co_varnames", &mut self.code_varnames),
            FieldTag::offset_of("PyCodeObject.co_firstlineno", &mut self.code_firstlineno),
            FieldTag::offset_of("PyTupleObject.ob_item", &mut self.tuple_item),
        ]
    }
}

impl Python27 {
    pub fn to_canonical(&self) -> PythonLayout {
        PythonLayout {
            ob_type_offset: self.ob_type,
            string_data_offset: self.string_data,
            string_size_offset: self.string_size,
            type_name_offset: self.type_name,
            thread_state_interp_offset: self.ts_interp,
            thread_state_next_offset: self.ts_next,
            thread_state_frame_offset: self.ts_frame,
            thread_state_thread_id_offset: self.ts_thread_id,
            thread_state_native_thread_id_offset: DOES_NOT_EXIST,
            thread_state_cframe_offset: DOES_NOT_EXIST,
            cframe_current_frame_offset: 0,
            interpreter_state_tstate_head_offset: self.interp_tstate_head,
            runtime_state_interp_main_offset: DOES_NOT_EXIST,
            frame_back_offset: self.frame_back,
            frame_code_offset: self.frame_code,
            frame_lineno_offset: self.frame_lineno,
            frame_localsplus_offset: self.frame_localsplus,
            code_filename_offset: self.code_filename,
            code_name_offset: self.code_name,
            code_varnames_offset: self.code_varnames,
            code_firstlineno_offset: self.code_firstlineno,
            tuple_item_offset: self.tuple_item,
        }
    }
}

/// CPython 3.3 through 3.9: `PyStringObject` is gone, string layout is
/// read off `PyASCIIObject`'s whole size instead of a per-field offset.
pub struct Python33To39 {
    pub ob_type: i64,
    pub string_data: i64,
    pub string_size: i64,
    pub type_name: i64,
    pub ts_interp: i64,
    pub ts_next: i64,
    pub ts_frame: i64,
    pub ts_thread_id: i64,
    pub interp_tstate_head: i64,
    pub frame_back: i64,
    pub frame_code: i64,
    pub frame_lineno: i64,
    pub frame_localsplus: i64,
    pub code_filename: i64,
    pub code_name: i64,
    pub code_varnames: i64,
    pub code_firstlineno: i64,
    pub tuple_item: i64,
}

impl Default for Python33To39 {
    fn default() -> Self {
        Python33To39 {
            ob_type: DOES_NOT_EXIST,
            string_data: DOES_NOT_EXIST,
            string_size: DOES_NOT_EXIST,
            type_name: DOES_NOT_EXIST,
            ts_interp: DOES_NOT_EXIST,
            ts_next: DOES_NOT_EXIST,
            ts_frame: DOES_NOT_EXIST,
            ts_thread_id: DOES_NOT_EXIST,
            interp_tstate_head: DOES_NOT_EXIST,
            frame_back: DOES_NOT_EXIST,
            frame_code: DOES_NOT_EXIST,
            frame_lineno: DOES_NOT_EXIST,
            frame_localsplus: DOES_NOT_EXIST,
            code_filename: DOES_NOT_EXIST,
            code_name: DOES_NOT_EXIST,
            code_varnames: DOES_NOT_EXIST,
            code_firstlineno: DOES_NOT_EXIST,
            tuple_item: DOES_NOT_EXIST,
        }
    }
}

impl Describe for Python33To39 {
    fn describe(&mut self) -> Vec<FieldTag<'_>> {
        vec![
            FieldTag::offset_of("PyObject.ob_type", &mut self.ob_type),
            FieldTag::size_of("PyASCIIObject", &mut self.string_data),
            FieldTag::offset_of("PyVarObject.ob_size", &mut self.string_size),
            FieldTag::offset_of("PyTypeObject.tp_name", &mut self.type_name),
            FieldTag::offset_of("PyThreadState.interp", &mut self.ts_interp),
            FieldTag::offset_of("PyThreadState.next", &mut self.ts_next),
            FieldTag::offset_of("PyThreadState.frame", &mut self.ts_frame),
            FieldTag::offset_of("PyThreadState.thread_id", &mut self.ts_thread_id),
            FieldTag::offset_of(
                "PyInterpreterState.tstate_head",
                &mut self.interp_tstate_head,
            ),
            FieldTag::offset_of("PyFrameObject.f_back", &mut self.frame_back),
            FieldTag::offset_of("PyFrameObject.f_code", &mut self.frame_code),
            FieldTag::offset_of("PyFrameObject.f_lineno", &mut self.frame_lineno),
            FieldTag::offset_of("PyFrameObject.f_localsplus", &mut self.frame_localsplus),
            FieldTag::offset_of("PyCodeObject.co_filename", &mut self.code_filename),
            FieldTag::offset_of("PyCodeObject.co_name", &mut self.code_name),
            FieldTag::offset_of("PyCodeObject.co_varnames", &mut self.code_varnames),
            FieldTag::offset_of("PyCodeObject.co_firstlineno", &mut self.code_firstlineno),
            FieldTag::offset_of("PyTupleObject.ob_item", &mut self.tuple_item),
        ]
    }
}

impl Python33To39 {
    pub fn to_canonical(&self) -> PythonLayout {
        PythonLayout {
            ob_type_offset: self.ob_type,
            string_data_offset: self.string_data,
            string_size_offset: self.string_size,
            type_name_offset: self.type_name,
            thread_state_interp_offset: self.ts_interp,
            thread_state_next_offset: self.ts_next,
            thread_state_frame_offset: self.ts_frame,
            thread_state_thread_id_offset: self.ts_thread_id,
            thread_state_native_thread_id_offset: DOES_NOT_EXIST,
            thread_state_cframe_offset: DOES_NOT_EXIST,
            cframe_current_frame_offset: 0,
            interpreter_state_tstate_head_offset: self.interp_tstate_head,
            runtime_state_interp_main_offset: DOES_NOT_EXIST,
            frame_back_offset: self.frame_back,
            frame_code_offset: self.frame_code,
            frame_lineno_offset: self.frame_lineno,
            frame_localsplus_offset: self.frame_localsplus,
            code_filename_offset: self.code_filename,
            code_name_offset: self.code_name,
            code_varnames_offset: self.code_varnames,
            code_firstlineno_offset: self.code_firstlineno,
            tuple_item_offset: self.tuple_item,
        }
    }
}

/// CPython 3.10 through 3.12: frames moved to `_PyInterpreterFrame`, the
/// per-thread linked list and runtime-global interpreter pointer are both
/// reached by two-hop nested routes instead of two summed offsets.
pub struct Python3Modern {
    pub ob_type: i64,
    pub string_data: i64,
    pub type_name: i64,
    pub ts_interp: i64,
    pub ts_next: i64,
    pub ts_thread_id: i64,
    pub ts_native_thread_id: i64,
    pub ts_cframe: i64,
    pub cframe_current_frame: i64,
    pub interp_tstate_head: i64,
    pub runtime_interp_main: i64,
    pub frame_back: i64,
    pub frame_code: i64,
    pub frame_localsplus: i64,
    pub code_filename: i64,
    pub code_name: i64,
    pub code_varnames: i64,
    pub code_firstlineno: i64,
    pub tuple_item: i64,
    /// Whether this bucket has reached `_PyCFrame.current_frame` (3.11
    /// only) or leaves `CurrentFrame` at the constant 0 (3.10, 3.12).
    pub has_cframe_current_frame_tag: bool,
    pub has_native_thread_id_and_cframe: bool,
}

impl Python3Modern {
    fn new(has_cframe_current_frame_tag: bool, has_native_thread_id_and_cframe: bool) -> Self {
        Python3Modern {
            ob_type: DOES_NOT_EXIST,
            string_data: DOES_NOT_EXIST,
            type_name: DOES_NOT_EXIST,
            ts_interp: DOES_NOT_EXIST,
            ts_next: DOES_NOT_EXIST,
            ts_thread_id: DOES_NOT_EXIST,
            ts_native_thread_id: DOES_NOT_EXIST,
            ts_cframe: DOES_NOT_EXIST,
            cframe_current_frame: DOES_NOT_EXIST,
            interp_tstate_head: DOES_NOT_EXIST,
            runtime_interp_main: DOES_NOT_EXIST,
            frame_back: DOES_NOT_EXIST,
            frame_code: DOES_NOT_EXIST,
            frame_localsplus: DOES_NOT_EXIST,
            code_filename: DOES_NOT_EXIST,
            code_name: DOES_NOT_EXIST,
            code_varnames: DOES_NOT_EXIST,
            code_firstlineno: DOES_NOT_EXIST,
            tuple_item: DOES_NOT_EXIST,
            has_cframe_current_frame_tag,
            has_native_thread_id_and_cframe,
        }
    }

    pub fn python310() -> Self {
        Python3Modern::new(false, false)
    }

    pub fn python311() -> Self {
        Python3Modern::new(true, true)
    }

    pub fn python312() -> Self {
        Python3Modern::new(false, true)
    }
}

impl Describe for Python3Modern {
    fn describe(&mut self) -> Vec<FieldTag<'_>> {
        let mut tags = vec![
            FieldTag::offset_of("PyObject.ob_type", &mut self.ob_type),
            FieldTag::size_of("PyASCIIObject", &mut self.string_data),
            FieldTag::offset_of("PyTypeObject.tp_name", &mut self.type_name),
            FieldTag::offset_of("PyThreadState.interp", &mut self.ts_interp),
            FieldTag::offset_of("PyThreadState.next", &mut self.ts_next),
            FieldTag::offset_of("PyThreadState.thread_id", &mut self.ts_thread_id),
            FieldTag::offset_of(
                "PyInterpreterState.threads.head",
                &mut self.interp_tstate_head,
            ),
            FieldTag::offset_of(
                "pyruntimestate.interpreters.main",
                &mut self.runtime_interp_main,
            ),
            FieldTag::offset_of("_PyInterpreterFrame.previous", &mut self.frame_back),
            FieldTag::offset_of("_PyInterpreterFrame.f_code", &mut self.frame_code),
            FieldTag::offset_of("_PyInterpreterFrame.localsplus", &mut self.frame_localsplus),
            FieldTag::offset_of("PyCodeObject.co_filename", &mut self.code_filename),
            FieldTag::offset_of("PyCodeObject.co_name", &mut self.code_name),
            FieldTag::offset_of("PyCodeObject.co_varnames", &mut self.code_varnames),
            FieldTag::offset_of("PyCodeObject.co_firstlineno", &mut self.code_firstlineno),
            FieldTag::offset_of("PyTupleObject.ob_item", &mut self.tuple_item),
        ];
        if self.has_native_thread_id_and_cframe {
            tags.push(FieldTag::offset_of(
                "PyThreadState.native_thread_id",
                &mut self.ts_native_thread_id,
            ));
            tags.push(FieldTag::offset_of(
                "PyThreadState.cframe",
                &mut self.ts_cframe,
            ));
        }
        if self.has_cframe_current_frame_tag {
            tags.push(FieldTag::offset_of(
                "_PyCFrame.current_frame",
                &mut self.cframe_current_frame,
            ));
        }
        tags
    }
}

impl Python3Modern {
    pub fn to_canonical(&self) -> PythonLayout {
        PythonLayout {
            ob_type_offset: self.ob_type,
            string_data_offset: self.string_data,
            string_size_offset: DOES_NOT_EXIST,
            type_name_offset: self.type_name,
            thread_state_interp_offset: self.ts_interp,
            thread_state_next_offset: self.ts_next,
            thread_state_frame_offset: DOES_NOT_EXIST,
            thread_state_thread_id_offset: self.ts_thread_id,
            thread_state_native_thread_id_offset: self.ts_native_thread_id,
            thread_state_cframe_offset: self.ts_cframe,
            cframe_current_frame_offset: if self.has_cframe_current_frame_tag {
                self.cframe_current_frame
            } else {
                0
            },
            interpreter_state_tstate_head_offset: self.interp_tstate_head,
            runtime_state_interp_main_offset: self.runtime_interp_main,
            frame_back_offset: self.frame_back,
            frame_code_offset: self.frame_code,
            frame_lineno_offset: DOES_NOT_EXIST,
            frame_localsplus_offset: self.frame_localsplus,
            code_filename_offset: self.code_filename,
            code_name_offset: self.code_name,
            code_varnames_offset: self.code_varnames,
            code_firstlineno_offset: self.code_firstlineno,
            tuple_item_offset: self.tuple_item,
        }
    }
}

/// CPython 3.13: frames carry `f_executable` instead of `f_code`, and the
/// currently-executing-frame pointer moved onto `PyThreadState` directly.
pub struct Python313 {
    pub ob_type: i64,
    pub string_data: i64,
    pub type_name: i64,
    pub ts_interp: i64,
    pub ts_next: i64,
    pub ts_thread_id: i64,
    pub ts_native_thread_id: i64,
    pub ts_current_frame: i64,
    pub interp_tstate_head: i64,
    pub runtime_interp_main: i64,
    pub frame_back: i64,
    pub frame_executable: i64,
    pub frame_localsplus: i64,
    pub code_filename: i64,
    pub code_name: i64,
    pub code_firstlineno: i64,
    pub code_varnames: i64,
    pub tuple_item: i64,
}

impl Default for Python313 {
    fn default() -> Self {
        Python313 {
            ob_type: DOES_NOT_EXIST,
            string_data: DOES_NOT_EXIST,
            type_name: DOES_NOT_EXIST,
            ts_interp: DOES_NOT_EXIST,
            ts_next: DOES_NOT_EXIST,
            ts_thread_id: DOES_NOT_EXIST,
            ts_native_thread_id: DOES_NOT_EXIST,
            ts_current_frame: DOES_NOT_EXIST,
            interp_tstate_head: DOES_NOT_EXIST,
            runtime_interp_main: DOES_NOT_EXIST,
            frame_back: DOES_NOT_EXIST,
            frame_executable: DOES_NOT_EXIST,
            frame_localsplus: DOES_NOT_EXIST,
            code_filename: DOES_NOT_EXIST,
            code_name: DOES_NOT_EXIST,
            code_firstlineno: DOES_NOT_EXIST,
            code_varnames: DOES_NOT_EXIST,
            tuple_item: DOES_NOT_EXIST,
        }
    }
}

impl Describe for Python313 {
    fn describe(&mut self) -> Vec<FieldTag<'_>> {
        vec![
            FieldTag::offset_of("PyObject.ob_type", &mut self.ob_type),
            FieldTag::size_of("PyASCIIObject", &mut self.string_data),
            FieldTag::offset_of("PyTypeObject.tp_name", &mut self.type_name),
            FieldTag::offset_of("PyThreadState.interp", &mut self.ts_interp),
            FieldTag::offset_of("PyThreadState.next", &mut self.ts_next),
            FieldTag::offset_of("PyThreadState.thread_id", &mut self.ts_thread_id),
            FieldTag::offset_of(
                "PyThreadState.native_thread_id",
                &mut self.ts_native_thread_id,
            ),
            FieldTag::offset_of("PyThreadState.current_frame", &mut self.ts_current_frame),
            FieldTag::offset_of(
                "PyInterpreterState.threads.head",
                &mut self.interp_tstate_head,
            ),
            FieldTag::offset_of(
                "pyruntimestate.interpreters.main",
                &mut self.runtime_interp_main,
            ),
            FieldTag::offset_of("_PyInterpreterFrame.previous", &mut self.frame_back),
            FieldTag::offset_of("_PyInterpreterFrame.f_executable", &mut self.frame_executable),
            FieldTag::offset_of("_PyInterpreterFrame.localsplus", &mut self.frame_localsplus),
            FieldTag::offset_of("PyCodeObject.co_filename", &mut self.code_filename),
            FieldTag::offset_of("PyCodeObject.co_name", &mut self.code_name),
            FieldTag::offset_of("PyCodeObject.co_firstlineno", &mut self.code_firstlineno),
            FieldTag::offset_of("PyCodeObject.co_varnames", &mut self.code_varnames),
            FieldTag::offset_of("PyTupleObject.ob_item", &mut self.tuple_item),
        ]
    }
}

impl Python313 {
    pub fn to_canonical(&self) -> PythonLayout {
        PythonLayout {
            ob_type_offset: self.ob_type,
            string_data_offset: self.string_data,
            string_size_offset: DOES_NOT_EXIST,
            type_name_offset: self.type_name,
            thread_state_interp_offset: self.ts_interp,
            thread_state_next_offset: self.ts_next,
            thread_state_frame_offset: DOES_NOT_EXIST,
            thread_state_thread_id_offset: self.ts_thread_id,
            thread_state_native_thread_id_offset: self.ts_native_thread_id,
            thread_state_cframe_offset: DOES_NOT_EXIST,
            cframe_current_frame_offset: self.ts_current_frame,
            interpreter_state_tstate_head_offset: self.interp_tstate_head,
            runtime_state_interp_main_offset: self.runtime_interp_main,
            frame_back_offset: self.frame_back,
            frame_code_offset: self.frame_executable,
            frame_lineno_offset: DOES_NOT_EXIST,
            frame_localsplus_offset: self.frame_localsplus,
            code_filename_offset: self.code_filename,
            code_name_offset: self.code_name,
            code_varnames_offset: self.code_varnames,
            code_firstlineno_offset: self.code_firstlineno,
            tuple_item_offset: self.tuple_item,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RubyLayout {
    pub vm_offset: i64,
    pub vm_size_offset: i64,
    pub control_frame_sizeof: i64,
    pub cfp_offset: i64,
    pub label_offset: i64,
    /// Constant across every supported Ruby bucket; not read from debug
    /// info (the source's `PathFlavour`).
    pub path_flavour: i64,
    pub line_info_table_offset: i64,
    pub line_info_size_offset: i64,
    pub main_thread_offset: i64,
    pub ec_offset: i64,
}

impl RubyLayout {
    pub fn to_layout_data(&self) -> LayoutData {
        let mut data = LayoutData::new();
        data.insert("vm_offset".to_string(), self.vm_offset);
        data.insert("vm_size_offset".to_string(), self.vm_size_offset);
        data.insert(
            "control_frame_sizeof".to_string(),
            self.control_frame_sizeof,
        );
        data.insert("cfp_offset".to_string(), self.cfp_offset);
        data.insert("label_offset".to_string(), self.label_offset);
        data.insert("path_flavour".to_string(), self.path_flavour);
        data.insert(
            "line_info_table_offset".to_string(),
            self.line_info_table_offset,
        );
        data.insert(
            "line_info_size_offset".to_string(),
            self.line_info_size_offset,
        );
        data.insert("main_thread_offset".to_string(), self.main_thread_offset);
        data.insert("ec_offset".to_string(), self.ec_offset);
        data
    }
}

pub struct Ruby26To27 {
    pub vm_offset: i64,
    pub vm_size_offset: i64,
    pub control_frame_sizeof: i64,
    pub cfp_offset: i64,
    pub label_offset: i64,
    pub line_info_table_offset: i64,
    pub line_info_size_offset: i64,
    pub main_thread_offset: i64,
    pub ec_offset: i64,
}

impl Default for Ruby26To27 {
    fn default() -> Self {
        Ruby26To27 {
            vm_offset: DOES_NOT_EXIST,
            vm_size_offset: DOES_NOT_EXIST,
            control_frame_sizeof: DOES_NOT_EXIST,
            cfp_offset: DOES_NOT_EXIST,
            label_offset: DOES_NOT_EXIST,
            line_info_table_offset: DOES_NOT_EXIST,
            line_info_size_offset: DOES_NOT_EXIST,
            main_thread_offset: DOES_NOT_EXIST,
            ec_offset: DOES_NOT_EXIST,
        }
    }
}

impl Describe for Ruby26To27 {
    fn describe(&mut self) -> Vec<FieldTag<'_>> {
        vec![
            FieldTag::offset_of(
                "rb_execution_context_struct.vm_stack",
                &mut self.vm_offset,
            ),
            FieldTag::offset_of(
                "rb_execution_context_struct.vm_stack_size",
                &mut self.vm_size_offset,
            ),
            FieldTag::size_of("rb_control_frame_struct", &mut self.control_frame_sizeof),
            FieldTag::offset_of("rb_execution_context_struct.cfp", &mut self.cfp_offset),
            FieldTag::offset_of("rb_iseq_location_struct.label", &mut self.label_offset),
            FieldTag::offset_of(
                "rb_iseq_constant_body.insns_info",
                &mut self.line_info_table_offset,
            ),
            FieldTag::offset_of(
                "rb_iseq_constant_body.insns_info.size",
                &mut self.line_info_size_offset,
            ),
            FieldTag::offset_of("rb_vm_struct.main_thread", &mut self.main_thread_offset),
            FieldTag::offset_of("rb_thread_struct.ec", &mut self.ec_offset),
        ]
    }
}

impl Ruby26To27 {
    pub fn to_canonical(&self) -> RubyLayout {
        RubyLayout {
            vm_offset: self.vm_offset,
            vm_size_offset: self.vm_size_offset,
            control_frame_sizeof: self.control_frame_sizeof,
            cfp_offset: self.cfp_offset,
            label_offset: self.label_offset,
            path_flavour: 1,
            line_info_table_offset: self.line_info_table_offset,
            line_info_size_offset: self.line_info_size_offset,
            main_thread_offset: self.main_thread_offset,
            ec_offset: self.ec_offset,
        }
    }
}

/// Ruby 3.x: the VM's thread list moved behind a ractor indirection, so
/// both `main_thread` and the running execution-context pointer gained
/// one extra hop.
pub struct Ruby3x {
    pub vm_offset: i64,
    pub vm_size_offset: i64,
    pub control_frame_sizeof: i64,
    pub cfp_offset: i64,
    pub label_offset: i64,
    pub line_info_table_offset: i64,
    pub line_info_size_offset: i64,
    pub main_thread_offset: i64,
    pub ec_offset: i64,
}

impl Default for Ruby3x {
    fn default() -> Self {
        Ruby3x {
            vm_offset: DOES_NOT_EXIST,
            vm_size_offset: DOES_NOT_EXIST,
            control_frame_sizeof: DOES_NOT_EXIST,
            cfp_offset: DOES_NOT_EXIST,
            label_offset: DOES_NOT_EXIST,
            line_info_table_offset: DOES_NOT_EXIST,
            line_info_size_offset: DOES_NOT_EXIST,
            main_thread_offset: DOES_NOT_EXIST,
            ec_offset: DOES_NOT_EXIST,
        }
    }
}

impl Describe for Ruby3x {
    fn describe(&mut self) -> Vec<FieldTag<'_>> {
        vec![
            FieldTag::offset_of(
                "rb_execution_context_struct.vm_stack",
                &mut self.vm_offset,
            ),
            FieldTag::offset_of(
                "rb_execution_context_struct.vm_stack_size",
                &mut self.vm_size_offset,
            ),
            FieldTag::size_of("rb_control_frame_struct", &mut self.control_frame_sizeof),
            FieldTag::offset_of("rb_execution_context_struct.cfp", &mut self.cfp_offset),
            FieldTag::offset_of("rb_iseq_location_struct.label", &mut self.label_offset),
            FieldTag::offset_of(
                "rb_iseq_constant_body.insns_info",
                &mut self.line_info_table_offset,
            ),
            FieldTag::offset_of(
                "rb_iseq_constant_body.insns_info.size",
                &mut self.line_info_size_offset,
            ),
            FieldTag::offset_of(
                "rb_vm_struct.ractor.main_thread",
                &mut self.main_thread_offset,
            ),
            FieldTag::offset_of(
                "rb_ractor_struct.threads.running_ec",
                &mut self.ec_offset,
            ),
        ]
    }
}

impl Ruby3x {
    pub fn to_canonical(&self) -> RubyLayout {
        RubyLayout {
            vm_offset: self.vm_offset,
            vm_size_offset: self.vm_size_offset,
            control_frame_sizeof: self.control_frame_sizeof,
            cfp_offset: self.cfp_offset,
            label_offset: self.label_offset,
            path_flavour: 1,
            line_info_table_offset: self.line_info_table_offset,
            line_info_size_offset: self.line_info_size_offset,
            // the struct walked one extra ractor-owned thread pointer
            // the descriptor can't see from here; adjust down by a
            // pointer width until the route covers it directly.
            main_thread_offset: self.main_thread_offset - 8,
            ec_offset: self.ec_offset,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlibcLayout {
    pub pthread_specific_1stblock_offset: i64,
    pub pthread_sizeof: i64,
    pub pthread_key_data_data_offset: i64,
    pub pthread_key_data_sizeof: i64,
}

impl GlibcLayout {
    pub fn to_layout_data(&self) -> LayoutData {
        let mut data = LayoutData::new();
        data.insert(
            "pthread_specific_1stblock_offset".to_string(),
            self.pthread_specific_1stblock_offset,
        );
        data.insert("pthread_sizeof".to_string(), self.pthread_sizeof);
        data.insert(
            "pthread_key_data_data_offset".to_string(),
            self.pthread_key_data_data_offset,
        );
        data.insert(
            "pthread_key_data_sizeof".to_string(),
            self.pthread_key_data_sizeof,
        );
        data
    }
}

pub struct GlibcPthread {
    pub pthread_specific_1stblock: i64,
    pub pthread_sizeof: i64,
    pub pthread_key_data_data: i64,
    pub pthread_key_data_sizeof: i64,
}

impl Default for GlibcPthread {
    fn default() -> Self {
        GlibcPthread {
            pthread_specific_1stblock: DOES_NOT_EXIST,
            pthread_sizeof: DOES_NOT_EXIST,
            pthread_key_data_data: DOES_NOT_EXIST,
            pthread_key_data_sizeof: DOES_NOT_EXIST,
        }
    }
}

impl Describe for GlibcPthread {
    fn describe(&mut self) -> Vec<FieldTag<'_>> {
        vec![
            FieldTag::offset_of(
                "pthread.specific_1stblock",
                &mut self.pthread_specific_1stblock,
            ),
            FieldTag::size_of("pthread", &mut self.pthread_sizeof),
            FieldTag::offset_of(
                "pthread_key_data.data",
                &mut self.pthread_key_data_data,
            ),
            FieldTag::size_of("pthread_key_data", &mut self.pthread_key_data_sizeof),
        ]
    }
}

impl GlibcPthread {
    pub fn to_canonical(&self) -> GlibcLayout {
        GlibcLayout {
            pthread_specific_1stblock_offset: self.pthread_specific_1stblock,
            pthread_sizeof: self.pthread_sizeof,
            pthread_key_data_data_offset: self.pthread_key_data_data,
            pthread_key_data_sizeof: self.pthread_key_data_sizeof,
        }
    }
}

/// The known runtime families a descriptor can target (design note 2:
/// "a tagged variant over the known runtime families").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeFamily {
    Python,
    Ruby,
    Glibc,
}

impl std::str::FromStr for RuntimeFamily {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "python" => Ok(RuntimeFamily::Python),
            "ruby" => Ok(RuntimeFamily::Ruby),
            "glibc" => Ok(RuntimeFamily::Glibc),
            other => Err(format!("unknown runtime family {other:?}")),
        }
    }
}

impl fmt::Display for RuntimeFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeFamily::Python => write!(f, "python"),
            RuntimeFamily::Ruby => write!(f, "ruby"),
            RuntimeFamily::Glibc => write!(f, "glibc"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn python27_tags_cover_every_destination() {
        let mut bucket = Python27::default();
        assert_eq!(bucket.describe().len(), 18);
    }

    #[test]
    fn python3_modern_311_includes_cframe_tags() {
        let mut bucket = Python3Modern::python311();
        let tags = bucket.describe();
        assert!(tags.iter().any(|t| t.tag == "_PyCFrame.current_frame"));
        assert!(tags.iter().any(|t| t.tag == "PyThreadState.cframe"));
    }

    #[test]
    fn python3_modern_310_omits_cframe_tags() {
        let mut bucket = Python3Modern::python310();
        let tags = bucket.describe();
        assert!(!tags.iter().any(|t| t.tag == "_PyCFrame.current_frame"));
        assert!(!tags.iter().any(|t| t.tag == "PyThreadState.cframe"));
    }

    #[test]
    fn ruby3x_main_thread_is_adjusted_down_by_eight() {
        let bucket = Ruby3x {
            main_thread_offset: 40,
            ..Ruby3x::default()
        };
        assert_eq!(bucket.to_canonical().main_thread_offset, 32);
    }

    #[test]
    fn ruby26_27_does_not_adjust_main_thread() {
        let bucket = Ruby26To27 {
            main_thread_offset: 192,
            ..Ruby26To27::default()
        };
        assert_eq!(bucket.to_canonical().main_thread_offset, 192);
    }

    #[test]
    fn python_layout_flattens_every_field_into_layout_data() {
        let layout = Python3Modern::python311().to_canonical();
        let data = layout.to_layout_data();
        assert_eq!(data.len(), 22);
        assert_eq!(data["ob_type_offset"], DOES_NOT_EXIST);
    }

    #[test]
    fn runtime_family_round_trips_through_display_and_from_str() {
        for family in [RuntimeFamily::Python, RuntimeFamily::Ruby, RuntimeFamily::Glibc] {
            let parsed: RuntimeFamily = family.to_string().parse().unwrap();
            assert_eq!(parsed, family);
        }
    }
}
