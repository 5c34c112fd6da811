// src/wgpu_utils/uniform_buffer.rs
use std::{marker::PhantomData, num::NonZeroU64};

/// Uniform buffer holding one `Content` slot per draw, bound with a dynamic
/// offset.
///
/// Slots are padded to the device's uniform offset alignment.
pub struct DynamicUniformBuffer<Content> {
    buffer: wgpu::Buffer,
    content_type: PhantomData<Content>,
    stride: u64,
    capacity: usize,
    staging: Vec<u8>,
}

impl<Content: bytemuck::Pod> DynamicUniformBuffer<Content> {
    fn name() -> &'static str {
        let type_name = std::any::type_name::<Content>();
        let pos = type_name.rfind(':').unwrap_or(0);
        if pos > 0 {
            &type_name[(pos + 1)..]
        } else {
            type_name
        }
    }

    /// Bytes between consecutive slots for a device with the given alignment.
    pub fn stride_for(alignment: u32) -> u64 {
        let size = std::mem::size_of::<Content>() as u64;
        let alignment = u64::from(alignment.max(1));
        size.div_ceil(alignment) * alignment
    }

    pub fn new(device: &wgpu::Device, capacity: usize) -> Self {
        let stride = Self::stride_for(device.limits().min_uniform_buffer_offset_alignment);
        let capacity = capacity.max(1);
        DynamicUniformBuffer {
            buffer: Self::create_buffer(device, stride, capacity),
            content_type: PhantomData,
            stride,
            capacity,
            staging: Vec::new(),
        }
    }

    fn create_buffer(device: &wgpu::Device, stride: u64, capacity: usize) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("DynamicUniformBuffer: {}", Self::name())),
            size: stride * capacity as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    /// Grows the buffer to hold at least `count` slots. Returns `true` when
    /// the buffer was recreated and bind groups referring to it are stale.
    pub fn reserve(&mut self, device: &wgpu::Device, count: usize) -> bool {
        if count <= self.capacity {
            return false;
        }
        let capacity = count.next_power_of_two();
        self.buffer.destroy();
        self.buffer = Self::create_buffer(device, self.stride, capacity);
        self.capacity = capacity;
        true
    }

    /// Writes `contents` into consecutive slots starting at slot 0.
    pub fn write(&mut self, queue: &wgpu::Queue, contents: &[Content]) {
        assert!(contents.len() <= self.capacity, "Data exceeds buffer capacity");
        if contents.is_empty() {
            return;
        }
        self.staging.clear();
        self.staging.resize(self.stride as usize * contents.len(), 0);
        for (slot, content) in self.staging.chunks_mut(self.stride as usize).zip(contents) {
            let bytes = bytemuck::bytes_of(content);
            slot[..bytes.len()].copy_from_slice(bytes);
        }
        queue.write_buffer(&self.buffer, 0, &self.staging);
    }

    /// Dynamic offset of slot `index`.
    pub fn offset(&self, index: usize) -> u32 {
        (self.stride * index as u64) as u32
    }

    /// Binding covering a single slot; the dynamic offset selects which.
    pub fn binding_resource(&self) -> wgpu::BindingResource<'_> {
        wgpu::BindingResource::Buffer(wgpu::BufferBinding {
            buffer: &self.buffer,
            offset: 0,
            size: NonZeroU64::new(std::mem::size_of::<Content>() as u64),
        })
    }
}

impl<Content> Drop for DynamicUniformBuffer<Content> {
    fn drop(&mut self) {
        self.buffer.destroy();
    }
}
