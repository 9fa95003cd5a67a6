//! Binary buffer packing for the fixture document.

use bytemuck::Pod;
use gltf_json as json;
use json::validation::Checked::Valid;

/// One `.bin` buffer plus the views and accessors that describe it
#[derive(Default)]
pub(crate) struct BufferBuilder {
    pub data: Vec<u8>,
    pub views: Vec<json::buffer::View>,
    pub accessors: Vec<json::Accessor>,
}

fn align_buffer(buffer: &mut Vec<u8>) {
    while !buffer.len().is_multiple_of(4) {
        buffer.push(0);
    }
}

impl BufferBuilder {
    /// Append raw bytes as a new buffer view
    pub fn push_view(
        &mut self,
        bytes: &[u8],
        target: Option<json::buffer::Target>,
    ) -> json::Index<json::buffer::View> {
        align_buffer(&mut self.data);
        let offset = self.data.len();
        self.data.extend_from_slice(bytes);
        self.views.push(json::buffer::View {
            buffer: json::Index::new(0),
            byte_length: bytes.len().into(),
            byte_offset: Some(offset.into()),
            byte_stride: None,
            extensions: Default::default(),
            extras: Default::default(),
            name: None,
            target: target.map(Valid),
        });
        json::Index::new(self.views.len() as u32 - 1)
    }

    /// Append `items` in their own view with an accessor over all of them
    pub fn push_accessor<T: Pod>(
        &mut self,
        items: &[T],
        component: json::accessor::ComponentType,
        type_: json::accessor::Type,
        bounds: Option<(Vec<f32>, Vec<f32>)>,
    ) -> json::Index<json::Accessor> {
        let target = match type_ {
            json::accessor::Type::Mat4 => None,
            json::accessor::Type::Scalar if component == json::accessor::ComponentType::U32 => {
                Some(json::buffer::Target::ElementArrayBuffer)
            }
            _ => Some(json::buffer::Target::ArrayBuffer),
        };
        let view = self.push_view(bytemuck::cast_slice(items), target);

        let to_value = |values: Vec<f32>| {
            json::Value::Array(values.into_iter().map(json::Value::from).collect())
        };
        let (min, max) = match bounds {
            Some((min, max)) => (Some(to_value(min)), Some(to_value(max))),
            None => (None, None),
        };

        self.accessors.push(json::Accessor {
            buffer_view: Some(view),
            byte_offset: Some(0u64.into()),
            count: items.len().into(),
            component_type: Valid(json::accessor::GenericComponentType(component)),
            extensions: Default::default(),
            extras: Default::default(),
            type_: Valid(type_),
            min,
            max,
            name: None,
            normalized: false,
            sparse: None,
        });
        json::Index::new(self.accessors.len() as u32 - 1)
    }
}
